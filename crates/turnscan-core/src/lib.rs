#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera identifiers.
pub mod camera;

/// Point types and the capacity-bounded point list.
pub mod points;

pub use crate::camera::CameraId;
pub use crate::points::{BoundedPointList, CapacityError, Pixel2d, Point3d};
