use std::time::Duration;

use bon::Builder;
use thiserror::Error;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// One colored sub-range of the gauge's value domain.
///
/// Bands are matched inclusively on both bounds. The configured list is
/// expected to tile `[min, max]` without overlap, but only `lo <= hi` is
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub color: Color,
    pub lo: f64,
    pub hi: f64,
}

impl ThresholdBand {
    pub const fn new(color: Color, lo: f64, hi: f64) -> Self {
        Self { color, lo, hi }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }
}

/// Invalid configuration, reported when a [`crate::Gauge`] is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("value range bounds must be finite")]
    NonFiniteRange,
    #[error("invalid value range: min {min} must be less than max {max}")]
    InvalidRange { min: f64, max: f64 },
    #[error("threshold band list is empty")]
    NoBands,
    #[error("threshold band bounds invalid: lo {lo}, hi {hi}")]
    InvalidBand { lo: f64, hi: f64 },
    #[error("animation duration must be positive")]
    InvalidDuration,
    #[error("font data could not be parsed")]
    InvalidFont,
}

fn default_bands() -> Vec<ThresholdBand> {
    vec![
        ThresholdBand::new(Color::new(0xff, 0x00, 0x00), 0.0, 33.0),
        ThresholdBand::new(Color::new(0xff, 0xff, 0x00), 34.0, 66.0),
        ThresholdBand::new(Color::new(0x00, 0xff, 0x00), 67.0, 100.0),
    ]
}

/// Gauge configuration. Build one with [`GaugeConfig::builder`]; any field
/// left unset keeps its default, and a supplied `bands` list replaces the
/// default list wholesale.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 100.0)]
    pub max: f64,
    /// Description label drawn beneath the arc.
    #[builder(default = String::new())]
    pub desc: String,

    #[builder(default = Color::new(0xed, 0xeb, 0xeb))]
    pub background_color: Color,
    #[builder(default = Color::new(0x00, 0x00, 0x00))]
    pub value_text_color: Color,
    #[builder(default = Color::new(0xd9, 0xd9, 0xd9))]
    pub desc_text_color: Color,

    /// Blend adjacent band colors across the foreground sweep. When off, the
    /// foreground is a single flat color.
    #[builder(default = true)]
    pub continuous_color: bool,
    #[builder(default = default_bands())]
    pub bands: Vec<ThresholdBand>,

    #[builder(default = true)]
    pub animate: bool,
    #[builder(default = Duration::from_millis(1000))]
    pub anim_duration: Duration,

    // Window configuration
    #[builder(default = "Gauge".to_string())]
    pub title: String,
    #[builder(default = 480)]
    pub window_width: u32,
    #[builder(default = 320)]
    pub window_height: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Font configuration
    #[builder(default = include_bytes!("DejaVuSans-Bold.ttf"))]
    pub value_font_data: &'static [u8],
    #[builder(default = include_bytes!("DejaVuSans.ttf"))]
    pub label_font_data: &'static [u8],
}

impl GaugeConfig {
    /// Check the configuration and normalize the band list (sorted ascending
    /// by upper bound, as the blend algorithm requires).
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFiniteRange);
        }
        if self.min >= self.max {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        if self.bands.is_empty() {
            return Err(ConfigError::NoBands);
        }
        for band in &self.bands {
            if !band.lo.is_finite() || !band.hi.is_finite() || band.lo > band.hi {
                return Err(ConfigError::InvalidBand {
                    lo: band.lo,
                    hi: band.hi,
                });
            }
        }
        if self.anim_duration.is_zero() {
            return Err(ConfigError::InvalidDuration);
        }
        self.bands.sort_by(|a, b| a.hi.total_cmp(&b.hi));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GaugeConfig::builder().build().validated().unwrap();
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.bands.len(), 3);
        assert!(config.continuous_color);
        assert!(config.animate);
        assert_eq!(config.anim_duration, Duration::from_millis(1000));
        assert_eq!(config.background_color, Color::new(0xed, 0xeb, 0xeb));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = GaugeConfig::builder()
            .min(10.0)
            .max(10.0)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }));
    }

    #[test]
    fn non_finite_range_is_rejected() {
        let err = GaugeConfig::builder()
            .min(f64::NAN)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteRange));
    }

    #[test]
    fn empty_band_list_is_rejected() {
        let err = GaugeConfig::builder()
            .bands(vec![])
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoBands));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let bands = vec![ThresholdBand::new(Color::RED, 50.0, 10.0)];
        let err = GaugeConfig::builder()
            .bands(bands)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBand { .. }));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = GaugeConfig::builder()
            .anim_duration(Duration::ZERO)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration));
    }

    #[test]
    fn bands_are_sorted_by_upper_bound() {
        let bands = vec![
            ThresholdBand::new(Color::new(0x00, 0xff, 0x00), 67.0, 100.0),
            ThresholdBand::new(Color::new(0xff, 0x00, 0x00), 0.0, 33.0),
            ThresholdBand::new(Color::new(0xff, 0xff, 0x00), 34.0, 66.0),
        ];
        let config = GaugeConfig::builder()
            .bands(bands)
            .build()
            .validated()
            .unwrap();
        assert_eq!(config.bands[0].hi, 33.0);
        assert_eq!(config.bands[1].hi, 66.0);
        assert_eq!(config.bands[2].hi, 100.0);
    }

    #[test]
    fn supplied_bands_replace_defaults_wholesale() {
        let bands = vec![
            ThresholdBand::new(Color::new(0x00, 0x00, 0xff), 0.0, 50.0),
            ThresholdBand::new(Color::new(0xff, 0x00, 0xff), 51.0, 100.0),
        ];
        let config = GaugeConfig::builder()
            .bands(bands)
            .build()
            .validated()
            .unwrap();
        assert_eq!(config.bands.len(), 2);
    }
}
