use turnscan_3d::io::points3d::PointsIoError;
use turnscan_core::{CameraId, CapacityError};
use turnscan_imgproc::laser::LaserError;
use turnscan_io::IoError;

/// An error type for the scanning session.
///
/// Every variant aborts the session: the point lists can no longer be trusted to
/// describe a consistent scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error reading a configuration or calibration file.
    #[error("Failed to read configuration file. {0}")]
    ConfigFile(#[from] std::io::Error),

    /// Error parsing a configuration or calibration file.
    #[error("Failed to parse configuration file. {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The frame of a camera could not be obtained or decoded.
    #[error("{camera}, step {step}: failed to get frame. {source}")]
    Frame {
        /// The camera of the frame.
        camera: CameraId,
        /// The rotation step of the frame.
        step: u32,
        /// The underlying error.
        source: IoError,
    },

    /// The laser stripe extraction failed.
    #[error("{camera}, step {step}: {source}")]
    Extraction {
        /// The camera of the frame.
        camera: CameraId,
        /// The rotation step of the frame.
        step: u32,
        /// The underlying error.
        source: LaserError,
    },

    /// The 3D point list of a camera is full.
    #[error("{camera}, step {step}: {source}")]
    Capacity {
        /// The camera whose list is full.
        camera: CameraId,
        /// The rotation step being translated.
        step: u32,
        /// The underlying error.
        source: CapacityError,
    },

    /// A step was processed after a later step of the same camera.
    #[error("{camera}: step {step} processed after step {last}")]
    StepOutOfOrder {
        /// The camera.
        camera: CameraId,
        /// The requested step.
        step: u32,
        /// The last translated step.
        last: u32,
    },

    /// Centroids of another step are still waiting for translation.
    #[error("{camera}: step {step} requested while step {pending} is not translated")]
    PendingStep {
        /// The camera.
        camera: CameraId,
        /// The requested step.
        step: u32,
        /// The step of the untranslated centroids.
        pending: u32,
    },

    /// Error saving the point clouds.
    #[error(transparent)]
    PointsIo(#[from] PointsIoError),
}
