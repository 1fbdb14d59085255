//! Tunables for the tail, the fortune meter and the avatar visuals.
//!
//! Every field has a serde default, so a config file only needs the keys it changes:
//!
//! ```toml
//! [tail]
//! min_length = 5
//!
//! [fortune]
//! burst_duration_ms = 8000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tail: TailConfig,
    pub fortune: FortuneConfig,
    pub avatar: AvatarConfig,
    pub meter: MeterConfig,
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json` file as JSON and anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tail.validate()?;
        self.fortune.validate()?;
        self.avatar.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Size of the segment pool.
    pub max_segments: usize,
    /// History samples between consecutive segments.
    pub segment_spacing: usize,
    pub min_length: usize,
    pub initial_length: usize,
    pub base_scale: f32,
    pub scale_falloff: f32,
    /// Horizontal gap per segment before spacing compression.
    pub base_body_offset: f32,
    /// Gap unit used for the tip; the tip gets `tail_offset_unit - base_body_offset` extra.
    pub tail_offset_unit: f32,
    pub direction_smoothing: f32,
    pub spacing_smoothing: f32,
    /// Largest rotation, in radians, a segment turns per tick.
    pub rotation_step: f32,
    /// Both velocity components must exceed this for movement to count as diagonal.
    pub diagonal_threshold: f32,
    pub diagonal_spacing: f32,
    /// When set, smoothing factors are tuned for this frame rate and rescaled by `dt`.
    pub reference_hz: Option<f32>,
}

impl TailConfig {
    /// Tail whose length is driven by fortune percent; may shrink down to two segments.
    pub fn fortune_driven() -> Self {
        Self {
            max_segments: 30,
            segment_spacing: 6,
            min_length: 2,
            initial_length: 5,
            base_scale: 0.9,
            scale_falloff: 0.4,
            base_body_offset: 7.0,
            tail_offset_unit: 14.0,
            direction_smoothing: 0.1,
            spacing_smoothing: 0.1,
            rotation_step: 0.1,
            diagonal_threshold: 20.0,
            diagonal_spacing: 0.3,
            reference_hz: None,
        }
    }

    /// Tail that never drops below five segments.
    pub fn fixed_length() -> Self {
        Self {
            min_length: 5,
            ..Self::fortune_driven()
        }
    }

    pub fn history_capacity(&self) -> usize {
        self.max_segments * self.segment_spacing + 1
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_segments == 0 {
            return Err(ConfigError::Invalid("tail.max_segments must be at least 1"));
        }
        if self.segment_spacing == 0 {
            return Err(ConfigError::Invalid("tail.segment_spacing must be at least 1"));
        }
        if self.min_length == 0 || self.min_length > self.max_segments {
            return Err(ConfigError::Invalid(
                "tail.min_length must be within 1..=max_segments",
            ));
        }
        for factor in [self.direction_smoothing, self.spacing_smoothing] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Invalid("tail smoothing factors must be in (0, 1]"));
            }
        }
        for length in [
            self.base_scale,
            self.scale_falloff,
            self.base_body_offset,
            self.tail_offset_unit,
            self.diagonal_threshold,
        ] {
            if !(length >= 0.0 && length.is_finite()) {
                return Err(ConfigError::Invalid(
                    "tail scales, offsets and thresholds must be finite and non-negative",
                ));
            }
        }
        let widest = self.base_body_offset.max(self.tail_offset_unit);
        if !((self.max_segments as f32 + 1.0) * widest).is_finite() {
            return Err(ConfigError::Invalid("tail offsets overflow across the segment pool"));
        }
        if !(self.rotation_step > 0.0) {
            return Err(ConfigError::Invalid("tail.rotation_step must be positive"));
        }
        if !(self.diagonal_spacing > 0.0) {
            return Err(ConfigError::Invalid("tail.diagonal_spacing must be positive"));
        }
        if let Some(hz) = self.reference_hz {
            if !(hz > 0.0 && hz.is_finite()) {
                return Err(ConfigError::Invalid("tail.reference_hz must be positive"));
            }
        }
        Ok(())
    }
}

impl Default for TailConfig {
    fn default() -> Self {
        Self::fortune_driven()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortuneConfig {
    pub max_fortune: f32,
    pub burst_duration_ms: u64,
    /// Fraction of `max_fortune` left behind when a burst runs out.
    pub safety_floor: f32,
    pub pickup_amount: f32,
    pub pickup_score: u32,
}

impl FortuneConfig {
    pub fn burst_duration(&self) -> Duration {
        Duration::from_millis(self.burst_duration_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_fortune > 0.0 && self.max_fortune.is_finite()) {
            return Err(ConfigError::Invalid("fortune.max_fortune must be positive"));
        }
        if self.burst_duration_ms == 0 {
            return Err(ConfigError::Invalid("fortune.burst_duration_ms must be non-zero"));
        }
        if !(0.0..1.0).contains(&self.safety_floor) {
            return Err(ConfigError::Invalid("fortune.safety_floor must be in [0, 1)"));
        }
        Ok(())
    }
}

impl Default for FortuneConfig {
    fn default() -> Self {
        Self {
            max_fortune: 100.0,
            burst_duration_ms: 5000,
            safety_floor: 0.2,
            pickup_amount: 10.0,
            pickup_score: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub head_depth: i32,
    /// Tail length at zero fortune.
    pub tail_length_base: usize,
    /// Extra segments gained at full fortune.
    pub tail_length_span: usize,
    /// Horizontal speed below `-direction_deadzone` flips the tail to trail on the right.
    pub direction_deadzone: f32,
    /// Rainbow hue advance per millisecond while bursting.
    pub hue_rate_per_ms: f32,
    pub bonk_duration_ms: u64,
    pub bonk_tint: Rgb,
    pub bonk_alpha: f32,
    pub particle_interval_ms: u64,
}

impl AvatarConfig {
    pub fn bonk_duration(&self) -> Duration {
        Duration::from_millis(self.bonk_duration_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bonk_alpha) {
            return Err(ConfigError::Invalid("avatar.bonk_alpha must be in [0, 1]"));
        }
        if !(self.direction_deadzone >= 0.0) {
            return Err(ConfigError::Invalid("avatar.direction_deadzone must not be negative"));
        }
        Ok(())
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            head_depth: 10,
            tail_length_base: 2,
            tail_length_span: 18,
            direction_deadzone: 5.0,
            hue_rate_per_ms: 0.005,
            bonk_duration_ms: 500,
            bonk_tint: Rgb::RED,
            bonk_alpha: 0.5,
            particle_interval_ms: 20,
        }
    }
}

/// Geometry and palette of the fortune bar widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub idle_color: Rgb,
    /// Bar color when a burst has just started.
    pub burst_fresh_color: Rgb,
    /// Bar color as the burst is about to run out.
    pub burst_spent_color: Rgb,
    pub glow_color: Rgb,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 30.0,
            corner_radius: 6.0,
            idle_color: Rgb::GOLD,
            burst_fresh_color: Rgb::from_rgb(255, 100, 0),
            burst_spent_color: Rgb::from_rgb(255, 0, 255),
            glow_color: Rgb::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.tail.history_capacity(), 181);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = GameConfig::from_toml_str(
            r#"
            [tail]
            min_length = 5

            [fortune]
            burst_duration_ms = 8000
            "#,
        )
        .unwrap();
        assert_eq!(config.tail.min_length, 5);
        assert_eq!(config.tail.max_segments, 30);
        assert_eq!(config.fortune.burst_duration(), Duration::from_secs(8));
        assert_eq!(config.fortune.safety_floor, 0.2);
    }

    #[test]
    fn json_is_accepted() {
        let config =
            GameConfig::from_json_str(r#"{ "avatar": { "bonk_tint": 65280 } }"#).unwrap();
        assert_eq!(config.avatar.bonk_tint, Rgb(0x00ff00));
    }

    #[test]
    fn rejects_min_length_above_pool() {
        let err = GameConfig::from_toml_str("[tail]\nmin_length = 31\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_floor_of_one() {
        let err = GameConfig::from_toml_str("[fortune]\nsafety_floor = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_max_fortune() {
        for text in ["[fortune]\nmax_fortune = 0.0\n", "[fortune]\nmax_fortune = -10.0\n"] {
            let err = GameConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
    }

    #[test]
    fn rejects_zero_burst_duration() {
        let err = GameConfig::from_toml_str("[fortune]\nburst_duration_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_smoothing_outside_unit_interval() {
        for text in [
            "[tail]\ndirection_smoothing = 0.0\n",
            "[tail]\ndirection_smoothing = 1.5\n",
            "[tail]\nspacing_smoothing = -0.1\n",
        ] {
            let err = GameConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
        let full = GameConfig::from_toml_str("[tail]\nspacing_smoothing = 1.0\n").unwrap();
        assert_eq!(full.tail.spacing_smoothing, 1.0);
    }

    #[test]
    fn rejects_zero_segment_spacing() {
        let err = GameConfig::from_toml_str("[tail]\nsegment_spacing = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_offsets_that_cannot_be_placed() {
        for text in [
            "[tail]\nbase_body_offset = 3.4e38\n",
            "[tail]\ntail_offset_unit = -14.0\n",
            "[tail]\nbase_scale = -0.9\n",
            "[tail]\ndiagonal_threshold = inf\n",
        ] {
            let err = GameConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GameConfig::from_toml_str("[tail\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn presets_differ_only_in_min_length() {
        let fixed = TailConfig::fixed_length();
        let driven = TailConfig::fortune_driven();
        assert_eq!(fixed.min_length, 5);
        assert_eq!(driven.min_length, 2);
        assert_eq!(TailConfig { min_length: 2, ..fixed }, driven);
    }
}
