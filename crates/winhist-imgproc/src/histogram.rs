use num_traits::Zero;
use rayon::prelude::*;

use winhist_image::Image;

use crate::error::HistogramError;

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram, accumulated into.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid or the histogram buffer
/// does not match it.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize};
/// use winhist_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [u64],
    num_bins: usize,
) -> Result<(), HistogramError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(HistogramError::InvalidNumBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(HistogramError::InvalidHistogramLength(hist.len(), num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0u64; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[bin_lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0u64; num_bins],
            |mut a, b| {
                for (i, val) in b.iter().enumerate() {
                    a[i] += val;
                }
                a
            },
        );

    for (out, count) in hist.iter_mut().zip(counts) {
        *out += count;
    }

    Ok(())
}

/// Compare two histograms by intersection.
///
/// The intersection similarity is the sum over bins of the elementwise
/// minimum; two identical histograms score their total count, disjoint ones
/// score zero.
///
/// # Errors
///
/// Returns an error if the histograms have different lengths.
///
/// # Example
///
/// ```
/// use winhist_imgproc::histogram::intersection;
///
/// let similarity = intersection(&[3u64, 0, 2], &[1, 4, 2]).unwrap();
/// assert_eq!(similarity, 3);
/// ```
pub fn intersection<T>(hist1: &[T], hist2: &[T]) -> Result<T, HistogramError>
where
    T: Copy + Ord + Zero,
{
    if hist1.len() != hist2.len() {
        return Err(HistogramError::InvalidHistogramLength(
            hist2.len(),
            hist1.len(),
        ));
    }

    Ok(hist1
        .iter()
        .zip(hist2.iter())
        .fold(T::zero(), |acc, (&a, &b)| acc + a.min(b)))
}

/// Compare two histograms by the chi-square distance.
///
/// The distance is the sum over bins of `(a - b)^2 / a`, skipping bins where
/// the first histogram is empty. Identical histograms are at distance zero;
/// larger values mean less similar.
///
/// # Errors
///
/// Returns an error if the histograms have different lengths.
pub fn chi_square(hist1: &[u64], hist2: &[u64]) -> Result<f64, HistogramError> {
    if hist1.len() != hist2.len() {
        return Err(HistogramError::InvalidHistogramLength(
            hist2.len(),
            hist1.len(),
        ));
    }

    Ok(hist1
        .iter()
        .zip(hist2.iter())
        .filter(|(&a, _)| a > 0)
        .fold(0f64, |acc, (&a, &b)| {
            let diff = a as f64 - b as f64;
            acc + diff * diff / a as f64
        }))
}
