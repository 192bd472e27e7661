use serde::{Deserialize, Serialize};

/// Identifies one of the two cameras watching the turntable.
///
/// Camera `A` is the reference viewpoint. Camera `B` sits at a fixed azimuthal
/// offset around the turntable, which the triangulation adds to the step angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraId {
    /// The first (reference) camera.
    A,
    /// The second camera.
    B,
}

impl CameraId {
    /// Both cameras in processing order.
    pub const ALL: [CameraId; 2] = [CameraId::A, CameraId::B];

    /// Name of the directory the camera frames are stored in.
    pub fn frames_dir(&self) -> &'static str {
        match self {
            CameraId::A => "Images_A",
            CameraId::B => "Images_B",
        }
    }
}

impl std::fmt::Display for CameraId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CameraId::A => write!(f, "camera A"),
            CameraId::B => write!(f, "camera B"),
        }
    }
}
