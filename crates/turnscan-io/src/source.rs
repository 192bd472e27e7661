use std::path::{Path, PathBuf};

use turnscan_core::CameraId;
use turnscan_image::Frame;

use crate::{error::IoError, functional::read_image_bmp};

/// A provider of decoded camera frames, one per camera and rotation step.
///
/// A missing frame is reported as [`IoError::FileDoesNotExist`] and a frame that
/// cannot be decoded as [`IoError::ImageDecodeError`].
pub trait FrameSource {
    /// Get the frame captured by `camera` at rotation `step`.
    fn frame(&mut self, step: u32, camera: CameraId) -> Result<Frame, IoError>;
}

impl<F> FrameSource for F
where
    F: FnMut(u32, CameraId) -> Result<Frame, IoError>,
{
    fn frame(&mut self, step: u32, camera: CameraId) -> Result<Frame, IoError> {
        self(step, camera)
    }
}

/// Reads frames from a capture directory.
///
/// The layout is `<root>/Images_A/<step>.bmp` and `<root>/Images_B/<step>.bmp`.
#[derive(Debug, Clone)]
pub struct BmpDirectorySource {
    root: PathBuf,
}

impl BmpDirectorySource {
    /// Create a source reading below `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The path of the frame for a given step and camera.
    pub fn frame_path(&self, step: u32, camera: CameraId) -> PathBuf {
        self.root
            .join(camera.frames_dir())
            .join(format!("{step}.bmp"))
    }
}

impl FrameSource for BmpDirectorySource {
    fn frame(&mut self, step: u32, camera: CameraId) -> Result<Frame, IoError> {
        let path = self.frame_path(step, camera);
        log::debug!("Extracting points from: {}", path.display());
        read_image_bmp(path)
    }
}
