//! Recognizer configuration

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use super::{Error, Result};

/// Tunable constants of the recognizer.
///
/// Every call site may carry its own configuration: the comet game accepts
/// strokes of 10 points or more, the recorder accepts any valid stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Points per canonical path (N)
    pub num_points: usize,
    /// Side of the reference square canonical paths are scaled into (S)
    pub square_size: f64,
    /// Half-range of the rotation search, in degrees
    pub angle_range_deg: f64,
    /// Bracket width at which the rotation search stops, in degrees
    pub angle_precision_deg: f64,
    /// Iteration cap of the rotation search
    pub max_search_iterations: usize,
    /// Fewest points `recognize` accepts
    pub min_points: usize,
    /// Bounding-box extent substituted for a zero width or height
    pub min_extent: f64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            num_points: 64,
            square_size: 250.0,
            angle_range_deg: 45.0,
            angle_precision_deg: 2.0,
            max_search_iterations: 32,
            min_points: 2,
            min_extent: 1e-6,
        }
    }
}

impl RecognizerConfig {
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_square_size(mut self, square_size: f64) -> Self {
        self.square_size = square_size;
        self
    }

    /// Half the diagonal of the reference square; a distance this large scores 0.
    pub fn half_diagonal(&self) -> f64 {
        0.5 * (2.0 * self.square_size * self.square_size).sqrt()
    }

    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.num_points < 2 {
            return Err(Error::Config(format!(
                "num_points must be at least 2, got {}", self.num_points
            )));
        }
        if !self.square_size.is_finite() || self.square_size <= 0.0 {
            return Err(Error::Config(format!(
                "square_size must be positive, got {}", self.square_size
            )));
        }
        if !(0.0..=180.0).contains(&self.angle_range_deg) {
            return Err(Error::Config(format!(
                "angle_range_deg must be in [0, 180], got {}", self.angle_range_deg
            )));
        }
        if !self.angle_precision_deg.is_finite() || self.angle_precision_deg <= 0.0 {
            return Err(Error::Config(format!(
                "angle_precision_deg must be positive, got {}", self.angle_precision_deg
            )));
        }
        if self.max_search_iterations == 0 {
            return Err(Error::Config("max_search_iterations must be > 0".to_string()));
        }
        if self.min_points < 2 {
            return Err(Error::Config(format!(
                "min_points must be at least 2, got {}", self.min_points
            )));
        }
        if !self.min_extent.is_finite() || self.min_extent <= 0.0 {
            return Err(Error::Config(format!(
                "min_extent must be positive, got {}", self.min_extent
            )));
        }
        Ok(())
    }

    /// Parse from TOML; missing fields take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = RecognizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_points, 64);
        assert!((config.half_diagonal() - 125.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = RecognizerConfig::from_toml_str("min_points = 10\nsquare_size = 1280.0\n").unwrap();
        assert_eq!(config.min_points, 10);
        assert_eq!(config.square_size, 1280.0);
        assert_eq!(config.num_points, 64);
        assert_eq!(config.angle_range_deg, 45.0);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            RecognizerConfig::default().with_min_points(1).validate(),
            Err(Error::Config(_))
        ));
        assert!(RecognizerConfig::default().with_square_size(0.0).validate().is_err());
        assert!(RecognizerConfig::from_toml_str("num_points = 1").is_err());
        assert!(RecognizerConfig::from_toml_str("angle_precision_deg = 0.0").is_err());
        assert!(matches!(
            RecognizerConfig::from_toml_str("num_points = \"many\""),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recognizer.toml");
        let config = RecognizerConfig::default().with_min_points(10);
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();
        let loaded = RecognizerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let res = RecognizerConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(res, Err(Error::Io(_))));
    }
}
