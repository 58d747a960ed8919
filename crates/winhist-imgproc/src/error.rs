use winhist_image::ImageError;

/// Errors produced by the histogram and integral image operations.
#[derive(thiserror::Error, Debug)]
pub enum HistogramError {
    /// Error coming from the underlying image type.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The requested number of histogram bins is out of range.
    #[error("number of bins ({0}) must be in [1, 256]")]
    InvalidNumBins(usize),

    /// The histogram buffer does not match the number of bins.
    #[error("histogram length ({0}) does not match the number of bins ({1})")]
    InvalidHistogramLength(usize, usize),

    /// The requested number of planes cannot index 8-bit intensities.
    #[error("number of planes ({0}) must be a power of two in [1, 256]")]
    InvalidPlaneCount(usize),

    /// The source image has no pixels.
    #[error("source image must not be empty (got {0}x{1})")]
    EmptyImage(usize, usize),

    /// The rectangle has a zero side.
    #[error("rectangle size ({0}x{1}) must be non-zero")]
    InvalidRectSize(usize, usize),

    /// The rectangle does not fit into the indexed image.
    #[error("rectangle reaching ({0}, {1}) exceeds the image bounds {2}x{3}")]
    RectOutOfBounds(usize, usize, usize, usize),

    /// The centered window does not fit into the indexed image.
    #[error("window centered at ({0}, {1}) with radius {2} extends outside the image")]
    WindowOutOfBounds(usize, usize, usize),

    /// The bin index is outside the indexed planes.
    #[error("bin index {0} out of range for {1} bins")]
    InvalidBinIndex(usize, usize),

    /// The block size for adaptive thresholding is unusable.
    #[error("block size ({0}) must be odd, non-zero and fit inside the image")]
    InvalidBlockSize(usize),
}
