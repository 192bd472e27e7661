#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for missing frames, decoding failures
/// and file access.
pub mod error;

/// BMP frame reading and writing.
///
/// Frames are kept in the BMP storage layout: BGR channel order, bottom-up rows.
pub mod functional;

/// Frame sources feeding the scanning loop.
///
/// See [`source::FrameSource`] and [`source::BmpDirectorySource`].
pub mod source;

pub use crate::error::IoError;
pub use crate::source::{BmpDirectorySource, FrameSource};
