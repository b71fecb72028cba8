//! Configuration management
//!
//! Selector sets and numeric thresholds for the overlay, loadable from TOML
//! files. Every field has a serde default so partial configs merge over the
//! shipped behavior; `validate()` rejects values the paint function cannot
//! work with.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::hover::SelectorSet;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Glyph footprint at rest, in pixels
    #[serde(default = "default_base_size")]
    pub base_size: f64,

    /// Hover category selector sets and text sizing
    #[serde(default)]
    pub hover: HoverConfig,

    /// Motion tracking thresholds
    #[serde(default)]
    pub motion: MotionConfig,

    /// Geometry/paint thresholds
    #[serde(default)]
    pub paint: PaintConfig,
}

fn default_base_size() -> f64 {
    10.0
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_size: default_base_size(),
            hover: HoverConfig::default(),
            motion: MotionConfig::default(),
            paint: PaintConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: OverlayConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate thresholds
    pub fn validate(&self) -> Result<()> {
        if !self.base_size.is_finite() || self.base_size <= 0.0 {
            bail!("base_size must be finite and positive");
        }
        self.hover.validate()?;
        self.motion.validate()?;
        self.paint.validate()?;
        Ok(())
    }
}

/// Hover detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverConfig {
    /// Text category: paragraphs, captions, headings
    #[serde(default = "default_text_selectors")]
    pub text: SelectorSet,

    /// Small-area category: inline links
    #[serde(default = "default_link_selectors")]
    pub link: SelectorSet,

    /// Large-area category: big clickable containers
    #[serde(default = "default_area_selectors")]
    pub area: SelectorSet,

    /// Glyph width over text, as a fraction of the font size
    #[serde(default = "default_text_width_ratio")]
    pub text_width_ratio: f64,

    /// Lower clamp for the text glyph width, in pixels
    #[serde(default = "default_text_min_width")]
    pub text_min_width: f64,

    /// Upper clamp for the text glyph width, in pixels
    #[serde(default = "default_text_max_width")]
    pub text_max_width: f64,
}

fn default_text_selectors() -> SelectorSet {
    SelectorSet::new(
        &[".hover-target-text", ".caption", "p", "h1", "h2", "h3"],
        &[
            ".hover-target-small",
            ".hover-target-big",
            "a *",
            ".hover-target-small *",
        ],
    )
}

// The small and large sets exclude each other's marker class, so an
// element maps to at most one of them.
fn default_link_selectors() -> SelectorSet {
    SelectorSet::new(&[".hover-target-small", "a"], &[".hover-target-big"])
}

fn default_area_selectors() -> SelectorSet {
    SelectorSet::new(&[".hover-target-big"], &[".hover-target-small"])
}

fn default_text_width_ratio() -> f64 {
    0.06
}
fn default_text_min_width() -> f64 {
    2.0
}
fn default_text_max_width() -> f64 {
    12.0
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            text: default_text_selectors(),
            link: default_link_selectors(),
            area: default_area_selectors(),
            text_width_ratio: default_text_width_ratio(),
            text_min_width: default_text_min_width(),
            text_max_width: default_text_max_width(),
        }
    }
}

impl HoverConfig {
    fn validate(&self) -> Result<()> {
        if !self.text_width_ratio.is_finite() || self.text_width_ratio <= 0.0 {
            bail!("hover.text_width_ratio must be finite and positive");
        }
        if self.text_min_width > self.text_max_width {
            bail!("hover.text_min_width must not exceed hover.text_max_width");
        }
        Ok(())
    }
}

/// Motion tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Quiet period after which velocity resets to zero (ms)
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

fn default_idle_timeout_ms() -> u64 {
    100
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl MotionConfig {
    fn validate(&self) -> Result<()> {
        if self.idle_timeout_ms == 0 {
            bail!("motion.idle_timeout_ms must be positive");
        }
        Ok(())
    }
}

/// Geometry/paint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintConfig {
    /// Skew ceiling outside text hover (degrees)
    #[serde(default = "default_skew_ceiling")]
    pub skew_ceiling: f64,

    /// Velocity-to-skew factor outside text hover
    #[serde(default = "default_skew_sensitivity")]
    pub skew_sensitivity: f64,

    /// Skew ceiling while hovering text (degrees)
    #[serde(default = "default_text_skew_ceiling")]
    pub text_skew_ceiling: f64,

    /// Velocity-to-skew factor while hovering text
    #[serde(default = "default_text_skew_sensitivity")]
    pub text_skew_sensitivity: f64,

    /// Highlight box size over large areas, as a multiple of the glyph
    #[serde(default = "default_area_scale")]
    pub area_scale: f64,

    /// Glyph scale while hovering a large area
    #[serde(default = "default_area_glyph_scale")]
    pub area_glyph_scale: f64,

    /// Highlight padding over links, as a fraction of each dimension
    #[serde(default = "default_link_padding_ratio")]
    pub link_padding_ratio: f64,

    /// Fraction of the center offset the highlight trails by over links
    #[serde(default = "default_link_lag")]
    pub link_lag: f64,

    /// Highlight opacity while a hover target is active
    #[serde(default = "default_highlight_opacity")]
    pub highlight_opacity: f64,
}

fn default_skew_ceiling() -> f64 {
    50.0
}
fn default_skew_sensitivity() -> f64 {
    4.0
}
fn default_text_skew_ceiling() -> f64 {
    5.0
}
fn default_text_skew_sensitivity() -> f64 {
    2.0
}
fn default_area_scale() -> f64 {
    4.0
}
fn default_area_glyph_scale() -> f64 {
    0.5
}
fn default_link_padding_ratio() -> f64 {
    0.05
}
fn default_link_lag() -> f64 {
    0.1
}
fn default_highlight_opacity() -> f64 {
    0.4
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            skew_ceiling: default_skew_ceiling(),
            skew_sensitivity: default_skew_sensitivity(),
            text_skew_ceiling: default_text_skew_ceiling(),
            text_skew_sensitivity: default_text_skew_sensitivity(),
            area_scale: default_area_scale(),
            area_glyph_scale: default_area_glyph_scale(),
            link_padding_ratio: default_link_padding_ratio(),
            link_lag: default_link_lag(),
            highlight_opacity: default_highlight_opacity(),
        }
    }
}

impl PaintConfig {
    fn validate(&self) -> Result<()> {
        let thresholds = [
            ("paint.skew_ceiling", self.skew_ceiling),
            ("paint.skew_sensitivity", self.skew_sensitivity),
            ("paint.text_skew_ceiling", self.text_skew_ceiling),
            ("paint.text_skew_sensitivity", self.text_skew_sensitivity),
            ("paint.area_scale", self.area_scale),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be finite and positive", name);
            }
        }
        let fractions = [
            ("paint.area_glyph_scale", self.area_glyph_scale),
            ("paint.link_padding_ratio", self.link_padding_ratio),
            ("paint.link_lag", self.link_lag),
            ("paint.highlight_opacity", self.highlight_opacity),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1]", name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_size, 10.0);
        assert_eq!(config.motion.idle_timeout_ms, 100);
        assert_eq!(config.paint.skew_ceiling, 50.0);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: OverlayConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_size, OverlayConfig::default().base_size);
        assert_eq!(config.hover.text, default_text_selectors());
    }

    #[test]
    fn test_partial_toml_merges_over_defaults() {
        let config: OverlayConfig = toml::from_str(
            r#"
            base_size = 14.0

            [paint]
            skew_ceiling = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.base_size, 14.0);
        assert_eq!(config.paint.skew_ceiling, 30.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.paint.skew_sensitivity, 4.0);
        assert_eq!(config.motion.idle_timeout_ms, 100);
    }

    #[test]
    fn test_selector_sets_roundtrip_through_toml() {
        let config: OverlayConfig = toml::from_str(
            r#"
            [hover.link]
            include = [".cta", "a"]
            exclude = [".plain"]
            "#,
        )
        .unwrap();
        assert_eq!(config.hover.link, SelectorSet::new(&[".cta", "a"], &[".plain"]));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_size = 12.0").unwrap();
        let config = OverlayConfig::load(file.path()).unwrap();
        assert_eq!(config.base_size, 12.0);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_size = -1.0").unwrap();
        assert!(OverlayConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let mut config = OverlayConfig::default();
        config.paint.link_lag = 1.5;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.motion.idle_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.hover.text_min_width = 20.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_area_and_link_defaults_exclude_each_other() {
        let config = HoverConfig::default();
        assert!(config
            .link
            .exclude
            .iter()
            .any(|pattern| config.area.include.contains(pattern)));
        assert!(config
            .area
            .exclude
            .iter()
            .any(|pattern| config.link.include.contains(pattern)));
    }
}
