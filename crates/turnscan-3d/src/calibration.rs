use serde::{Deserialize, Serialize};
use turnscan_core::CameraId;

/// Geometric constants of one camera, in image pixel units.
///
/// The image space follows the frame storage layout: rows grow upwards from the
/// bottom of the picture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// Vanishing point column.
    pub vp_x: i32,
    /// Vanishing point row.
    pub vp_y: i32,
    /// Secondary vanishing point column.
    pub vvp_x: i32,
    /// Secondary vanishing point row.
    pub vvp_y: i32,
    /// Column of the object base reference point.
    pub base_x: i32,
    /// Row of the object base reference point.
    pub base_y: i32,
    /// Slope of the drop line.
    pub base_m: f64,
    /// Intercept of the drop line.
    pub base_b: f64,
    /// Column beyond which stripe points are not reconstructable.
    pub wall_edge: i32,
    /// Which side of `wall_edge` is rejected.
    ///
    /// Positive rejects columns at or right of the edge, negative rejects columns at or
    /// left of it, zero disables the check.
    pub orientation: i32,
    /// Azimuthal offset in radians, added to the step angle of camera B only.
    #[serde(default)]
    pub angle_offset: f64,
}

impl CameraCalibration {
    /// Calibration of the reference rig, camera A.
    pub fn camera_a_default() -> Self {
        Self {
            vp_x: 224,
            vp_y: 465,
            vvp_x: 0,
            vvp_y: 0,
            base_x: 303,
            base_y: 238,
            base_m: -2.6,
            base_b: 1049.4,
            wall_edge: 261,
            orientation: -1,
            angle_offset: 0.0,
        }
    }

    /// Calibration of the reference rig, camera B.
    pub fn camera_b_default() -> Self {
        Self {
            vp_x: 813,
            vp_y: 897,
            vvp_x: 0,
            vvp_y: 0,
            base_x: 328,
            base_y: 233,
            base_m: 1.3684,
            base_b: -215.8352,
            wall_edge: 400,
            orientation: 1,
            angle_offset: 1.57,
        }
    }

    /// Check if a column lies on the rejected side of the wall edge.
    pub fn is_beyond_wall(&self, col: f64) -> bool {
        let edge = self.wall_edge as f64;
        (self.orientation > 0 && col >= edge) || (self.orientation < 0 && col <= edge)
    }

    /// Row where a vertical edge at column `col` meets the turntable base.
    #[inline]
    pub fn drop_row(&self, col: f64) -> f64 {
        self.base_m * col + self.base_b
    }
}

/// The calibration of both cameras.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StereoCalibration {
    /// Camera A calibration.
    pub camera_a: CameraCalibration,
    /// Camera B calibration.
    pub camera_b: CameraCalibration,
}

impl StereoCalibration {
    /// Get the calibration of a camera.
    pub fn get(&self, camera: CameraId) -> &CameraCalibration {
        match camera {
            CameraId::A => &self.camera_a,
            CameraId::B => &self.camera_b,
        }
    }
}

impl Default for StereoCalibration {
    fn default() -> Self {
        Self {
            camera_a: CameraCalibration::camera_a_default(),
            camera_b: CameraCalibration::camera_b_default(),
        }
    }
}
