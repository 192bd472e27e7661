#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// laser stripe centroid extraction module.
pub mod laser;
