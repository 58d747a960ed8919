#![deny(missing_docs)]
//! Image and rectangle types for histogram indexing

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// axis-aligned rectangular regions.
pub mod rect;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::rect::Rect;
