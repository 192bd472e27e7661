use turnscan_core::{CameraId, Point3d};

/// The reconstructed points of both cameras.
///
/// Iteration yields camera A fully, then camera B, each in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanCloud {
    // The points of camera A.
    camera_a: Vec<Point3d>,
    // The points of camera B.
    camera_b: Vec<Point3d>,
}

impl ScanCloud {
    /// Create a cloud from the points of each camera.
    pub fn new(camera_a: Vec<Point3d>, camera_b: Vec<Point3d>) -> Self {
        Self { camera_a, camera_b }
    }

    /// Get the number of points of both cameras.
    #[inline]
    pub fn len(&self) -> usize {
        self.camera_a.len() + self.camera_b.len()
    }

    /// Check if the cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.camera_a.is_empty() && self.camera_b.is_empty()
    }

    /// Get as reference the points of one camera.
    pub fn points(&self, camera: CameraId) -> &[Point3d] {
        match camera {
            CameraId::A => &self.camera_a,
            CameraId::B => &self.camera_b,
        }
    }

    /// Iterate over all points, camera A first.
    pub fn iter(&self) -> impl Iterator<Item = (CameraId, &Point3d)> {
        self.camera_a
            .iter()
            .map(|p| (CameraId::A, p))
            .chain(self.camera_b.iter().map(|p| (CameraId::B, p)))
    }

    /// Get the minimum and maximum bound of the cloud, `None` when empty.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let mut points = self.iter().map(|(_, p)| p.xyz());
        let first = points.next()?;
        Some(points.fold((first, first), |(mut lo, mut hi), p| {
            for i in 0..3 {
                lo[i] = lo[i].min(p[i]);
                hi[i] = hi[i].max(p[i]);
            }
            (lo, hi)
        }))
    }
}
