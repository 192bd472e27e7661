use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use turnscan_3d::triangulation::TriangulationParams;
use turnscan_image::ImageSize;
use turnscan_imgproc::laser::{LaserParams, LaserThresholds};

use crate::error::ScanError;

/// Parameters fixed for the whole scanning session.
///
/// Missing fields of a JSON file take the value of [`ScanConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Process every `row_stride`-th frame row.
    pub row_stride: usize,
    /// Laser thresholds in frame storage order (B, G, R for BMP frames).
    pub laser_thresholds: [u8; 3],
    /// Number of steps in a full turntable revolution.
    pub rev_steps: u32,
    /// Minimum height above the base, in pixels, for a point to be kept.
    pub base_safe_height: f64,
    /// Expected frame width in pixels.
    pub image_width: usize,
    /// Expected frame height in pixels.
    pub image_height: usize,
    /// Capacity of each per-camera point list.
    pub max_points: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            row_stride: 1,
            laser_thresholds: [75, 75, 150],
            rev_steps: 160,
            base_safe_height: 1.0,
            image_width: 640,
            image_height: 480,
            max_points: 524_288,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let config: Self = load_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can drive a session.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.row_stride == 0 {
            return Err(ScanError::InvalidConfig(
                "row_stride must be greater than zero".into(),
            ));
        }
        if self.rev_steps == 0 {
            return Err(ScanError::InvalidConfig(
                "rev_steps must be greater than zero".into(),
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ScanError::InvalidConfig(format!(
                "image size must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    /// The frame resolution the calibration was made for.
    pub fn image_size(&self) -> ImageSize {
        ImageSize {
            width: self.image_width,
            height: self.image_height,
        }
    }

    /// Parameters of the laser extraction.
    pub fn laser_params(&self) -> LaserParams {
        LaserParams {
            row_stride: self.row_stride,
            thresholds: LaserThresholds(self.laser_thresholds),
        }
    }

    /// Parameters of the triangulation.
    pub fn triangulation_params(&self) -> TriangulationParams {
        TriangulationParams {
            rev_steps: self.rev_steps,
            base_safe_height: self.base_safe_height,
            image_width: self.image_width,
        }
    }
}

/// Deserialize a JSON file.
pub fn load_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ScanError> {
    let data = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}
