//! Overlay settings. Every field has a default, so a config file only needs
//! the values it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampler::EdgePolicy;
use crate::types::Color;

/// Largest accepted surface width or height.
pub const MAX_SURFACE_SIDE: u32 = 16_384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    /// Logical surface resolution; all cursor and sampling math uses it.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Delay between two ticks of the render loop.
    pub tick_interval_ms: u64,
    /// Side of the sampled square. Independent of the indicator sizes.
    pub sample_size: u32,
    /// Crosshair arm length; also the offset from the cursor to the
    /// top-left corner of both the sample window and the outline box.
    pub indicator_half_size: u32,
    /// Side of the outline box drawn around the sample window.
    pub indicator_box_size: u32,
    pub stroke_width: u32,
    pub accent: Color,
    pub edge_policy: EdgePolicy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            surface_width: 1280,
            surface_height: 960,
            tick_interval_ms: 20,
            sample_size: 20,
            indicator_half_size: 10,
            indicator_box_size: 20,
            stroke_width: 5,
            accent: [255, 255, 0, 255], // yellow
            edge_policy: EdgePolicy::ZeroPad,
        }
    }
}

impl OverlayConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| Error::Config(format!("Parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.surface_width, "surfaceWidth"),
            (self.surface_height, "surfaceHeight"),
            (self.sample_size, "sampleSize"),
            (self.stroke_width, "strokeWidth"),
        ];
        for (value, name) in checks {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be greater than zero")));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tickIntervalMs must be greater than zero".into()));
        }

        for (value, name) in [(self.surface_width, "surfaceWidth"), (self.surface_height, "surfaceHeight")] {
            if value > MAX_SURFACE_SIDE {
                return Err(Error::Config(format!("{name} must be at most {MAX_SURFACE_SIDE}")));
            }
        }

        // Sample and indicator never need to be bigger than the surface itself;
        // the pen never needs to be wider than its short side.
        let long_side = self.surface_width.max(self.surface_height);
        let short_side = self.surface_width.min(self.surface_height);
        let limits = [
            (self.sample_size, long_side, "sampleSize"),
            (self.indicator_half_size, long_side, "indicatorHalfSize"),
            (self.indicator_box_size, long_side, "indicatorBoxSize"),
            (self.stroke_width, short_side, "strokeWidth"),
        ];
        for (value, max, name) in limits {
            if value > max {
                return Err(Error::Config(format!("{name} must be at most {max}, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_constants() {
        let c = OverlayConfig::default();
        assert_eq!((c.surface_width, c.surface_height), (1280, 960));
        assert_eq!(c.sample_size, 20);
        assert_eq!(c.indicator_half_size, 10);
        assert_eq!(c.tick_interval(), Duration::from_millis(20));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = OverlayConfig::from_json_str(r#"{ "sampleSize": 8, "edgePolicy": "clamp" }"#).unwrap();
        assert_eq!(c.sample_size, 8);
        assert_eq!(c.edge_policy, EdgePolicy::Clamp);
        assert_eq!(c.surface_width, 1280);
    }

    #[test]
    fn rejects_zero_sizes() {
        let err = OverlayConfig::from_json_str(r#"{ "surfaceWidth": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = OverlayConfig::from_json_str(r#"{ "tickIntervalMs": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("tickIntervalMs"));
    }

    #[test]
    fn rejects_sizes_larger_than_the_surface() {
        for json in [
            r#"{ "strokeWidth": 4000000000 }"#,
            r#"{ "sampleSize": 4294967295 }"#,
            r#"{ "indicatorHalfSize": 1281 }"#,
            r#"{ "indicatorBoxSize": 5000 }"#,
            r#"{ "surfaceWidth": 100000 }"#,
        ] {
            let err = OverlayConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{json} -> {err}");
        }
        // stroke is bounded by the short side, sample by the long one
        assert!(OverlayConfig::from_json_str(r#"{ "strokeWidth": 961 }"#).is_err());
        assert!(OverlayConfig::from_json_str(r#"{ "sampleSize": 1280, "strokeWidth": 960 }"#).is_ok());
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(OverlayConfig::from_json_str("{"), Err(Error::Config(_))));
    }
}
