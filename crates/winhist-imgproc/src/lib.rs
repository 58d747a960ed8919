#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the imgproc module.
pub mod error;

/// compute and compare image histogram module.
pub mod histogram;

/// integral image structures for constant-time region queries.
pub mod integral;

/// binary plane decomposition module.
pub mod planes;

/// sliding-window histogram search module.
pub mod search;

/// operations to threshold images.
pub mod threshold;
