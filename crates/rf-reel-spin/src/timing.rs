//! Phase duration estimates
//!
//! Analytic durations of the OUT and IN phases for a style, ignoring frame
//! quantization (each move or wait step may run up to one frame longer when
//! driven by `advance`).

use serde::{Deserialize, Serialize};

use crate::config::{InStyle, MotionSettings, OutStyle, ReelBounds, StyleConfig};
use crate::plan::bounce_waypoint;

/// Estimated durations of one spin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpinEstimate {
    pub out_secs: f32,
    pub in_secs: f32,
}

impl SpinEstimate {
    pub fn total_secs(&self) -> f32 {
        self.out_secs + self.in_secs
    }
}

/// Seconds to cover `distance` at a configured (unscaled) speed
#[inline]
pub fn travel_secs(distance: f32, speed: f32, motion: &MotionSettings) -> f32 {
    let units = motion.units_per_sec(speed);
    if units <= 0.0 {
        return f32::INFINITY;
    }
    distance.abs() / units
}

/// OUT duration: the slowest jittered reel for `All`, every reel plus its
/// trailing delay for `OneByOne`
pub fn estimate_out_secs(
    style: &StyleConfig,
    reel_count: usize,
    bounds: &ReelBounds,
    motion: &MotionSettings,
) -> f32 {
    if reel_count == 0 {
        return 0.0;
    }
    let distance = bounds.y_end - bounds.out_target();

    match style.out_style {
        OutStyle::All => travel_secs(distance, style.speed_out - style.per_reel_jitter, motion),
        OutStyle::OneByOne => {
            reel_count as f32 * (travel_secs(distance, style.speed_out, motion) + style.stagger_delay)
        }
    }
}

/// IN duration: the sum of every reel's legs
pub fn estimate_in_secs(
    style: &StyleConfig,
    reel_count: usize,
    bounds: &ReelBounds,
    motion: &MotionSettings,
) -> f32 {
    let per_reel = match style.in_style {
        InStyle::Robust => travel_secs(bounds.y_start - bounds.y_end, style.speed_in, motion),
        InStyle::Bouncy => {
            let waypoint = bounce_waypoint(style, bounds);
            travel_secs(bounds.y_start - waypoint, style.speed_in, motion)
                + travel_secs(waypoint - bounds.y_end, style.bounce_speed, motion)
        }
    };
    reel_count as f32 * per_reel
}

/// Both phases
pub fn estimate_spin(
    style: &StyleConfig,
    reel_count: usize,
    bounds: &ReelBounds,
    motion: &MotionSettings,
) -> SpinEstimate {
    SpinEstimate {
        out_secs: estimate_out_secs(style, reel_count, bounds, motion),
        in_secs: estimate_in_secs(style, reel_count, bounds, motion),
    }
}
