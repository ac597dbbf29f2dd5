//! Parameter types for photo cropping.

use crate::config::PhotoConfig;

/// Quality setting for JPEG encoding (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Output of a crop: a square of `output_size` pixels at `quality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSettings {
    pub output_size: u32,
    pub quality: Quality,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            output_size: 200,
            quality: Quality::default(),
        }
    }
}

impl From<&PhotoConfig> for CropSettings {
    fn from(config: &PhotoConfig) -> Self {
        Self {
            output_size: config.output_size.max(1),
            quality: Quality::new(config.quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(250).value(), 100);
        assert_eq!(Quality::new(80).value(), 80);
    }

    #[test]
    fn settings_follow_config() {
        let config = PhotoConfig {
            output_size: 320,
            quality: 90,
        };
        let settings = CropSettings::from(&config);
        assert_eq!(settings.output_size, 320);
        assert_eq!(settings.quality.value(), 90);
        assert_eq!(CropSettings::default().output_size, 200);
    }
}
