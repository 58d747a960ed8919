#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use winhist_image as image;

#[doc(inline)]
pub use winhist_imgproc as imgproc;
