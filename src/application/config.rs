use crate::domain::errors::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of one depth chart. Every field falls back to its default when
/// missing from the JSON source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Fractional price band around mid, `0.01` = 1%
    pub tolerance: Decimal,
    /// Lowest allowed zoom scale
    pub scale_extent: f64,
    /// Pixels reserved under the plot for the price axis
    pub axis_height: f64,
    /// Multiplier above the deepest cumulative volume on the y axis
    pub volume_headroom: Decimal,
    /// Width of a crosshair price label
    pub crosshair_width: f64,
    /// Frame interval hosts should drive `on_frame` at
    pub frame_budget_ms: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            scale_extent: 0.5,
            axis_height: 24.0,
            volume_headroom: Decimal::new(105, 2),
            crosshair_width: 79.0,
            frame_budget_ms: 16.0,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tolerance <= Decimal::ZERO || self.tolerance >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !self.scale_extent.is_finite() || self.scale_extent <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale_extent must be finite and positive, got {}",
                self.scale_extent
            )));
        }
        if !self.axis_height.is_finite() || self.axis_height < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "axis_height must be non-negative, got {}",
                self.axis_height
            )));
        }
        if self.volume_headroom < Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "volume_headroom must be at least 1, got {}",
                self.volume_headroom
            )));
        }
        if !self.crosshair_width.is_finite() || self.crosshair_width < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "crosshair_width must be at least 1, got {}",
                self.crosshair_width
            )));
        }
        if !self.frame_budget_ms.is_finite() || self.frame_budget_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "frame_budget_ms must be positive, got {}",
                self.frame_budget_ms
            )));
        }
        Ok(())
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_micros((self.frame_budget_ms * 1_000.0).round() as u64)
    }
}
