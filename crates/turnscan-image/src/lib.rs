#![deny(missing_docs)]
//! Pixel grid types for decoded camera frames

/// image representation for the scanning pipeline.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

/// An 8-bit, three channel camera frame.
///
/// Channels keep the storage order of the source file, see `turnscan-io`.
pub type Frame = Image<u8, 3>;
