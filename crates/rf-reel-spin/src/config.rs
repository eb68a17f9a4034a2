//! Spin configuration
//!
//! Everything here is plain data: validated once, then snapshotted into a
//! session at trigger time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::motion::DEFAULT_SNAP_THRESHOLD;
use crate::plan::bounce_waypoint;
use crate::symbols::SymbolSet;
use crate::{MAX_REELS, MIN_REELS};

/// How reels leave the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutStyle {
    /// Every reel at once, each with its own jittered speed
    #[default]
    All,
    /// Reel after reel, separated by the stagger delay
    OneByOne,
}

/// How reels come back into the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InStyle {
    /// Straight to the resting offset, one reel at a time
    #[default]
    Robust,
    /// Overshoot past the resting offset, then settle slowly
    Bouncy,
}

/// Secondary blur panel swept across the window during a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualOverlayConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Seconds after IN start at which the overlay is released
    #[serde(default = "default_window_duration")]
    pub window_duration: f32,
    /// Sweep speed (unscaled, like reel speeds)
    #[serde(default = "default_sweep_speed")]
    pub sweep_speed: f32,
    /// Offset the panel starts from (above the window)
    #[serde(default = "default_overlay_parked")]
    pub parked_offset: f32,
    /// Offset the panel holds at until released
    #[serde(default = "default_overlay_hold")]
    pub hold_offset: f32,
}

fn default_window_duration() -> f32 {
    0.5
}
fn default_sweep_speed() -> f32 {
    4.0
}
fn default_overlay_parked() -> f32 {
    1080.0
}
fn default_overlay_hold() -> f32 {
    540.0
}

impl Default for VisualOverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_duration: default_window_duration(),
            sweep_speed: default_sweep_speed(),
            parked_offset: default_overlay_parked(),
            hold_offset: default_overlay_hold(),
        }
    }
}

/// Spin style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinProfile {
    /// All out, robust in
    #[default]
    Classic,
    /// Classic at double speed
    Turbo,
    /// One by one out, bouncy in, overlay on
    Elastic,
    /// Hand-tuned values
    Custom,
}

impl std::str::FromStr for SpinProfile {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "turbo" => Ok(Self::Turbo),
            "elastic" => Ok(Self::Elastic),
            "custom" => Ok(Self::Custom),
            other => Err(ReelError::InvalidParam(format!("unknown profile: {other}"))),
        }
    }
}

/// Style of one spin, immutable for the duration of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub profile: SpinProfile,
    #[serde(default)]
    pub out_style: OutStyle,
    #[serde(default)]
    pub in_style: InStyle,
    /// OUT speed (units/s before scale factor)
    #[serde(default = "default_speed_out")]
    pub speed_out: f32,
    /// IN speed (units/s before scale factor)
    #[serde(default = "default_speed_in")]
    pub speed_in: f32,
    /// Settle speed of the bouncy second leg
    #[serde(default = "default_bounce_speed")]
    pub bounce_speed: f32,
    /// Relative part of the overshoot waypoint (`end * (1 + f) - offset`)
    #[serde(default = "default_overshoot_fraction")]
    pub bounce_overshoot_fraction: f32,
    /// Absolute part of the overshoot waypoint
    #[serde(default = "default_overshoot_offset")]
    pub bounce_overshoot_offset: f32,
    /// Half-width of the uniform per-reel speed jitter for `OutStyle::All`
    #[serde(default = "default_jitter")]
    pub per_reel_jitter: f32,
    /// Seconds between reels for `OutStyle::OneByOne`
    #[serde(default = "default_stagger")]
    pub stagger_delay: f32,
    #[serde(default)]
    pub visual_overlay: VisualOverlayConfig,
}

fn default_speed_out() -> f32 {
    6.0
}
fn default_speed_in() -> f32 {
    3.0
}
fn default_bounce_speed() -> f32 {
    1.0
}
fn default_overshoot_fraction() -> f32 {
    0.1
}
fn default_overshoot_offset() -> f32 {
    200.0
}
fn default_jitter() -> f32 {
    0.1
}
fn default_stagger() -> f32 {
    0.1
}

impl StyleConfig {
    /// All out, robust in
    pub fn classic() -> Self {
        Self {
            profile: SpinProfile::Classic,
            out_style: OutStyle::All,
            in_style: InStyle::Robust,
            speed_out: default_speed_out(),
            speed_in: default_speed_in(),
            bounce_speed: default_bounce_speed(),
            bounce_overshoot_fraction: default_overshoot_fraction(),
            bounce_overshoot_offset: default_overshoot_offset(),
            per_reel_jitter: default_jitter(),
            stagger_delay: default_stagger(),
            visual_overlay: VisualOverlayConfig::default(),
        }
    }

    /// Classic, twice as fast
    pub fn turbo() -> Self {
        Self {
            profile: SpinProfile::Turbo,
            ..Self::classic().scaled(0.5)
        }
    }

    /// Staggered out, elastic in, with the blur overlay
    pub fn elastic() -> Self {
        Self {
            profile: SpinProfile::Elastic,
            out_style: OutStyle::OneByOne,
            in_style: InStyle::Bouncy,
            bounce_speed: 1.5,
            visual_overlay: VisualOverlayConfig {
                enabled: true,
                ..VisualOverlayConfig::default()
            },
            ..Self::classic()
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: SpinProfile) -> Self {
        match profile {
            SpinProfile::Classic => Self::classic(),
            SpinProfile::Turbo => Self::turbo(),
            SpinProfile::Elastic => Self::elastic(),
            SpinProfile::Custom => Self {
                profile: SpinProfile::Custom,
                ..Self::classic()
            },
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            profile: SpinProfile::Custom,
            speed_out: self.speed_out / factor,
            speed_in: self.speed_in / factor,
            bounce_speed: self.bounce_speed / factor,
            per_reel_jitter: self.per_reel_jitter / factor,
            stagger_delay: self.stagger_delay * factor,
            visual_overlay: VisualOverlayConfig {
                window_duration: self.visual_overlay.window_duration * factor,
                sweep_speed: self.visual_overlay.sweep_speed / factor,
                ..self.visual_overlay.clone()
            },
            ..self.clone()
        }
    }

    /// Reject values that would stall a session or make it meaningless
    pub fn validate(&self) -> ReelResult<()> {
        positive_speed("speed_out", self.speed_out)?;
        positive_speed("speed_in", self.speed_in)?;
        positive_speed("bounce_speed", self.bounce_speed)?;

        non_negative("per_reel_jitter", self.per_reel_jitter)?;
        non_negative("stagger_delay", self.stagger_delay)?;
        finite("bounce_overshoot_fraction", self.bounce_overshoot_fraction)?;
        finite("bounce_overshoot_offset", self.bounce_overshoot_offset)?;

        // Slowest jittered reel must still move
        if self.out_style == OutStyle::All {
            positive_speed("speed_out - per_reel_jitter", self.speed_out - self.per_reel_jitter)?;
        }

        let overlay = &self.visual_overlay;
        if overlay.enabled {
            positive_speed("visual_overlay.sweep_speed", overlay.sweep_speed)?;
            non_negative("visual_overlay.window_duration", overlay.window_duration)?;
            finite("visual_overlay.parked_offset", overlay.parked_offset)?;
            finite("visual_overlay.hold_offset", overlay.hold_offset)?;
        }

        Ok(())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::classic()
    }
}

fn positive_speed(field: &'static str, value: f32) -> ReelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ReelError::InvalidSpeed { field, value })
    }
}

fn non_negative(field: &str, value: f32) -> ReelResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ReelError::InvalidParam(format!("{field} must be >= 0, got {value}")))
    }
}

fn finite(field: &str, value: f32) -> ReelResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReelError::InvalidParam(format!("{field} must be finite, got {value}")))
    }
}

/// Parked and resting reel offsets, constant for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelBounds {
    /// Parked-above offset reels spin in from
    #[serde(default = "default_y_start")]
    pub y_start: f32,
    /// Resting, visible offset
    #[serde(default)]
    pub y_end: f32,
}

fn default_y_start() -> f32 {
    1080.0
}

impl ReelBounds {
    /// Offset reels leave toward (below the window)
    #[inline]
    pub fn out_target(&self) -> f32 {
        -self.y_start
    }

    pub fn validate(&self) -> ReelResult<()> {
        finite("bounds.y_start", self.y_start)?;
        finite("bounds.y_end", self.y_end)?;
        if self.y_start == self.y_end {
            return Err(ReelError::InvalidParam(
                "bounds.y_start and bounds.y_end must differ".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ReelBounds {
    fn default() -> Self {
        Self {
            y_start: default_y_start(),
            y_end: 0.0,
        }
    }
}

/// Motion primitive tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSettings {
    /// Multiplier from configured speed to position units per second
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
    /// Snap distance
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f32,
}

fn default_scale_factor() -> f32 {
    1000.0
}
fn default_snap_threshold() -> f32 {
    DEFAULT_SNAP_THRESHOLD
}

impl MotionSettings {
    /// Convert a configured speed into units per second
    #[inline]
    pub fn units_per_sec(&self, speed: f32) -> f32 {
        speed * self.scale_factor
    }

    pub fn validate(&self) -> ReelResult<()> {
        positive_speed("motion.scale_factor", self.scale_factor)?;
        if !(self.snap_threshold.is_finite() && self.snap_threshold > 0.0) {
            return Err(ReelError::InvalidParam(format!(
                "motion.snap_threshold must be > 0, got {}",
                self.snap_threshold
            )));
        }
        Ok(())
    }
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            snap_threshold: default_snap_threshold(),
        }
    }
}

/// Top-level orchestrator configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    #[serde(default = "default_reel_count")]
    pub reel_count: usize,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub bounds: ReelBounds,
    #[serde(default)]
    pub motion: MotionSettings,
    #[serde(default)]
    pub symbols: SymbolSet,
    /// Fixed RNG seed for reproducible spins
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_reel_count() -> usize {
    MIN_REELS
}

impl SpinConfig {
    /// Config with a given reel count and style, defaults elsewhere
    pub fn new(reel_count: usize, style: StyleConfig) -> Self {
        Self {
            reel_count,
            style,
            ..Self::default()
        }
    }

    /// Builder: fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: symbol set
    pub fn with_symbols(mut self, symbols: SymbolSet) -> Self {
        self.symbols = symbols;
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> ReelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> ReelResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            Some("json") => Self::from_json(&text),
            other => Err(ReelError::InvalidParam(format!(
                "unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> ReelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ReelResult<()> {
        validate_reel_count(self.reel_count)?;
        self.style.validate()?;
        self.bounds.validate()?;
        validate_bounce(&self.style, &self.bounds)?;
        self.motion.validate()
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            reel_count: default_reel_count(),
            style: StyleConfig::default(),
            bounds: ReelBounds::default(),
            motion: MotionSettings::default(),
            symbols: SymbolSet::default(),
            seed: None,
        }
    }
}

/// A bouncy IN must overshoot: the waypoint lies strictly past `y_end`, on
/// the side away from `y_start`
pub fn validate_bounce(style: &StyleConfig, bounds: &ReelBounds) -> ReelResult<()> {
    if style.in_style != InStyle::Bouncy {
        return Ok(());
    }

    let waypoint = bounce_waypoint(style, bounds);
    if (waypoint - bounds.y_end) * (bounds.y_start - bounds.y_end) < 0.0 {
        Ok(())
    } else {
        Err(ReelError::InvalidParam(format!(
            "bounce waypoint {waypoint} does not overshoot y_end {} (y_start {})",
            bounds.y_end, bounds.y_start
        )))
    }
}

/// Configured reel counts are limited to `MIN_REELS..=MAX_REELS`
pub fn validate_reel_count(count: usize) -> ReelResult<()> {
    if (MIN_REELS..=MAX_REELS).contains(&count) {
        Ok(())
    } else {
        Err(ReelError::InvalidReelCount(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let classic = StyleConfig::classic();
        let turbo = StyleConfig::turbo();
        let elastic = StyleConfig::elastic();

        assert!(turbo.speed_out > classic.speed_out);
        assert!(turbo.stagger_delay < classic.stagger_delay);
        assert_eq!(turbo.profile, SpinProfile::Turbo);

        assert_eq!(elastic.out_style, OutStyle::OneByOne);
        assert_eq!(elastic.in_style, InStyle::Bouncy);
        assert!(elastic.visual_overlay.enabled);

        for profile in [SpinProfile::Classic, SpinProfile::Turbo, SpinProfile::Elastic] {
            assert!(StyleConfig::from_profile(profile).validate().is_ok());
        }
    }

    #[test]
    fn test_rejects_non_positive_speeds() {
        let mut style = StyleConfig::classic();
        style.speed_in = 0.0;
        assert!(matches!(
            style.validate(),
            Err(ReelError::InvalidSpeed { field: "speed_in", .. })
        ));

        let mut style = StyleConfig::classic();
        style.per_reel_jitter = 6.0;
        assert!(style.validate().is_err());

        // Jitter only matters when reels leave together
        style.out_style = OutStyle::OneByOne;
        assert!(style.validate().is_ok());

        let mut style = StyleConfig::classic();
        style.speed_out = f32::NAN;
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_bouncy_waypoint_must_overshoot_rest() {
        let bounds = ReelBounds {
            y_start: 1080.0,
            y_end: 2000.0,
        };
        // 2000 * 1.1 - 200 lands exactly on y_end
        let config = SpinConfig {
            bounds,
            ..SpinConfig::new(3, StyleConfig::elastic())
        };
        assert!(matches!(config.validate(), Err(ReelError::InvalidParam(_))));

        // Robust never visits the waypoint
        let config = SpinConfig {
            bounds,
            ..SpinConfig::new(3, StyleConfig::classic())
        };
        assert!(config.validate().is_ok());

        // Default bounds: waypoint -200 is past 0, away from 1080
        assert!(validate_bounce(&StyleConfig::elastic(), &ReelBounds::default()).is_ok());

        let mut style = StyleConfig::elastic();
        style.bounce_overshoot_offset = -200.0;
        assert!(validate_bounce(&style, &ReelBounds::default()).is_err());
    }

    #[test]
    fn test_overlay_validated_only_when_enabled() {
        let mut style = StyleConfig::classic();
        style.visual_overlay.sweep_speed = 0.0;
        assert!(style.validate().is_ok());

        style.visual_overlay.enabled = true;
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_reel_count_range() {
        assert!(validate_reel_count(2).is_err());
        assert!(validate_reel_count(3).is_ok());
        assert!(validate_reel_count(5).is_ok());
        assert!(matches!(
            validate_reel_count(6),
            Err(ReelError::InvalidReelCount(6))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SpinConfig::from_json(
            r#"{ "reel_count": 4, "style": { "out_style": "one_by_one", "speed_out": 8.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.reel_count, 4);
        assert_eq!(config.style.out_style, OutStyle::OneByOne);
        assert_eq!(config.style.in_style, InStyle::Robust);
        assert_eq!(config.style.speed_out, 8.0);
        assert_eq!(config.style.speed_in, 3.0);
        assert_eq!(config.bounds, ReelBounds::default());
        assert_eq!(config.symbols.len(), SymbolSet::classic().len());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "reel_count: 5\nstyle:\n  in_style: bouncy\n  visual_overlay:\n    enabled: true\nseed: 9\n";
        let config = SpinConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.reel_count, 5);
        assert_eq!(config.style.in_style, InStyle::Bouncy);
        assert!(config.style.visual_overlay.enabled);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_invalid_documents_rejected() {
        assert!(matches!(
            SpinConfig::from_json(r#"{ "reel_count": 7 }"#),
            Err(ReelError::InvalidReelCount(7))
        ));
        assert!(matches!(
            SpinConfig::from_json(r#"{ "symbols": [] }"#),
            Err(ReelError::Json(_))
        ));
        assert!(SpinConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_style() {
        let config = SpinConfig::new(4, StyleConfig::elastic()).with_seed(3);
        let json = config.to_json().unwrap();
        assert_eq!(SpinConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("Turbo".parse::<SpinProfile>().unwrap(), SpinProfile::Turbo);
        assert!("warp".parse::<SpinProfile>().is_err());
    }
}
