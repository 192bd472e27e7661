#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Per-camera calibration records.
pub mod calibration;

/// I/O utilities for reading and writing scanned point clouds.
pub mod io;

/// Point cloud of a scanning session.
pub mod pointcloud;

/// Conversion of laser centroids into object space points.
pub mod triangulation;
