#![deny(missing_docs)]
//! Turntable laser scanning sessions.
//!
//! A [`ScanSession`] owns, per camera, the calibration, the 2D laser centroids, the
//! reconstructed 3D points and the translation cursor. Each rotation step extracts the
//! laser stripe of both frames and translates the new centroids into object space.

/// Session configuration.
pub mod config;

/// Error types of the scanning session.
pub mod error;

/// The scanning session and per-camera state.
pub mod session;

pub use crate::config::{load_json_file, ScanConfig};
pub use crate::error::ScanError;
pub use crate::session::{CameraState, ScanSession, StepSummary};

#[doc(inline)]
pub use turnscan_core as core;

#[doc(inline)]
pub use turnscan_image as image;

#[doc(inline)]
pub use turnscan_imgproc as imgproc;

#[doc(inline)]
pub use turnscan_io as io;

#[doc(inline)]
pub use turnscan_3d as k3d;
