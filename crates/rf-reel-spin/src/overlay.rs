//! Visual overlay sweep
//!
//! A blur panel that slides from its parked offset to a hold offset while the
//! reels spin, holds there, and is hidden once released. It runs beside the
//! reel motion and never gates it.

use serde::{Deserialize, Serialize};

use crate::config::{MotionSettings, VisualOverlayConfig};
use crate::motion::MotionTask;
use crate::symbols::SymbolId;

/// Overlay lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayState {
    #[default]
    Hidden,
    /// Travelling toward the hold offset
    Sweeping,
    /// Parked at the hold offset until released
    Holding,
}

impl OverlayState {
    #[inline]
    pub fn is_visible(&self) -> bool {
        !matches!(self, OverlayState::Hidden)
    }
}

/// The overlay panel and its placeholder symbols (one per reel)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySweep {
    state: OverlayState,
    offset: f32,
    parked_offset: f32,
    task: Option<MotionTask>,
    placeholders: Vec<SymbolId>,
}

impl OverlaySweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Symbols shown on the overlay placeholders
    pub fn placeholders(&self) -> &[SymbolId] {
        &self.placeholders
    }

    pub(crate) fn set_placeholders(&mut self, symbols: Vec<SymbolId>) {
        self.placeholders = symbols;
    }

    /// Show the panel at its parked offset and start sweeping toward the hold offset
    pub fn show(&mut self, config: &VisualOverlayConfig, motion: &MotionSettings) {
        self.parked_offset = config.parked_offset;
        self.offset = config.parked_offset;
        self.task = Some(MotionTask::new(
            config.hold_offset,
            motion.units_per_sec(config.sweep_speed),
        ));
        self.state = OverlayState::Sweeping;
    }

    /// Advance the sweep by one tick; returns true on the tick the hold offset is reached
    pub fn advance(&mut self, frame_delta: f32, threshold: f32) -> bool {
        if self.state != OverlayState::Sweeping {
            return false;
        }
        let Some(task) = self.task else {
            self.state = OverlayState::Holding;
            return true;
        };

        if task.step(&mut self.offset, frame_delta, threshold).is_arrived() {
            self.task = None;
            self.state = OverlayState::Holding;
            return true;
        }
        false
    }

    /// Exit the hold and hide the panel; returns false if it was already hidden
    pub fn release(&mut self) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.task = None;
        self.offset = self.parked_offset;
        self.state = OverlayState::Hidden;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay_config() -> VisualOverlayConfig {
        VisualOverlayConfig {
            enabled: true,
            window_duration: 0.5,
            sweep_speed: 2.0,
            parked_offset: 1080.0,
            hold_offset: 540.0,
        }
    }

    #[test]
    fn test_sweep_then_hold() {
        let mut overlay = OverlaySweep::new();
        assert!(!overlay.is_visible());

        overlay.show(&overlay_config(), &MotionSettings::default());
        assert_eq!(overlay.state(), OverlayState::Sweeping);
        assert_eq!(overlay.offset(), 1080.0);

        // 540 units at 2000 units/s = 0.27s
        let mut reached = false;
        for _ in 0..30 {
            if overlay.advance(1.0 / 60.0, 0.1) {
                reached = true;
                break;
            }
        }
        assert!(reached);
        assert_eq!(overlay.state(), OverlayState::Holding);
        assert_eq!(overlay.offset(), 540.0);

        // Holding ignores further ticks
        assert!(!overlay.advance(1.0, 0.1));
        assert_eq!(overlay.offset(), 540.0);
    }

    #[test]
    fn test_release_hides_and_parks() {
        let mut overlay = OverlaySweep::new();
        overlay.show(&overlay_config(), &MotionSettings::default());
        overlay.advance(1.0 / 60.0, 0.1);

        assert!(overlay.release());
        assert_eq!(overlay.state(), OverlayState::Hidden);
        assert_eq!(overlay.offset(), 1080.0);
        assert!(!overlay.release());
    }
}
