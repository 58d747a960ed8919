use rayon::prelude::*;

use winhist_image::{ImageSize, Rect};

use crate::error::HistogramError;
use crate::histogram::intersection;
use crate::integral::{checked_corners, IntegralHistogram};

/// A window placement scored by [`find_best_window`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowMatch {
    /// The x-coordinate of the window's top-left corner.
    pub x: usize,
    /// The y-coordinate of the window's top-left corner.
    pub y: usize,
    /// The intersection similarity against the reference histogram.
    pub score: u64,
}

/// Prefer the higher score; on ties the placement closest to the region's
/// top-left, scanning rows first. Keeps the result independent of how rayon
/// splits the rows.
fn better(a: Option<WindowMatch>, b: Option<WindowMatch>) -> Option<WindowMatch> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let b_wins = b.score > a.score || (b.score == a.score && (b.y, b.x) < (a.y, a.x));
            Some(if b_wins { b } else { a })
        }
        (a, b) => a.or(b),
    }
}

/// Find the window placement whose histogram best matches a reference.
///
/// Slides a `window`-sized rectangle over every placement that lies fully
/// inside `region`, computes each placement's histogram from the index and
/// scores it against `reference` by histogram intersection. Rows of
/// placements are scanned in parallel.
///
/// # Arguments
///
/// * `index` - The integral histogram of the image to search.
/// * `reference` - The reference histogram, one count per indexed bin.
/// * `window` - The size of the sliding window.
/// * `region` - The area of the image the window may cover.
///
/// # Returns
///
/// The best placement with its score, or `None` when the window does not fit
/// inside the region.
///
/// # Errors
///
/// Returns an error if the reference length does not match the index, if the
/// region is degenerate, or if it extends beyond the indexed image.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize, Rect};
/// use winhist_imgproc::integral::IntegralHistogram;
/// use winhist_imgproc::search::find_best_window;
///
/// let mut data = vec![0u8; 8 * 8];
/// data[3 * 8 + 5] = 255; // lone bright pixel at (5, 3)
/// let image = Image::<u8, 1>::new(ImageSize { width: 8, height: 8 }, data).unwrap();
///
/// let index = IntegralHistogram::from_image(&image, 2).unwrap();
/// let reference = [0u64, 1]; // one bright pixel, nothing dark
/// let window = ImageSize { width: 1, height: 1 };
///
/// let found = find_best_window(&index, &reference, window, &Rect::new(0, 0, 8, 8))
///     .unwrap()
///     .unwrap();
/// assert_eq!((found.x, found.y), (5, 3));
/// ```
pub fn find_best_window(
    index: &IntegralHistogram,
    reference: &[u64],
    window: ImageSize,
    region: &Rect,
) -> Result<Option<WindowMatch>, HistogramError> {
    if reference.len() != index.num_bins() {
        return Err(HistogramError::InvalidHistogramLength(
            reference.len(),
            index.num_bins(),
        ));
    }
    checked_corners(index.size(), region)?;
    if window.width == 0 || window.height == 0 {
        return Err(HistogramError::InvalidRectSize(window.width, window.height));
    }
    if window.width > region.width || window.height > region.height {
        return Ok(None);
    }

    let x_last = region.right() - window.width;
    let y_last = region.bottom() - window.height;

    (region.y..=y_last)
        .into_par_iter()
        .map(|y| -> Result<Option<WindowMatch>, HistogramError> {
            let mut hist = vec![0u64; index.num_bins()];
            let mut row_best: Option<WindowMatch> = None;
            for x in region.x..=x_last {
                let rect = Rect::new(x, y, window.width, window.height);
                index.histogram_into(&rect, &mut hist)?;
                let score = intersection(reference, &hist)?;
                row_best = better(row_best, Some(WindowMatch { x, y, score }));
            }
            Ok(row_best)
        })
        .try_reduce(|| None, |a, b| Ok(better(a, b)))
}
