use rayon::prelude::*;

use winhist_image::{Image, ImageError};

use crate::error::HistogramError;
use crate::integral::IntegralImage;

/// Binarize an image against the mean intensity of the block around each pixel.
///
/// For every pixel with a full `block_size x block_size` neighborhood, the
/// block mean is computed from an integral image in constant time and the
/// pixel becomes 0 when it is darker than `mean - delta`, 255 otherwise.
/// Border pixels whose block does not fit inside the image are set to 255.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output binary image, same size as `src`.
/// * `block_size` - The side of the averaging block, odd and at most the
///   smaller image dimension.
/// * `delta` - Offset subtracted from the block mean before comparing.
///
/// # Errors
///
/// Returns an error if the sizes differ or the block size is unusable.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize};
/// use winhist_imgproc::threshold::adaptive_threshold_mean;
///
/// let size = ImageSize { width: 5, height: 5 };
/// let mut data = vec![200u8; 25];
/// data[12] = 10; // dark pixel in a bright field
/// let image = Image::<u8, 1>::new(size, data).unwrap();
///
/// let mut binary = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// adaptive_threshold_mean(&image, &mut binary, 3, 5).unwrap();
///
/// assert_eq!(binary.get([2, 2, 0]), Some(&0u8));
/// assert_eq!(binary.get([1, 2, 0]), Some(&255u8));
/// ```
pub fn adaptive_threshold_mean(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    block_size: usize,
    delta: i64,
) -> Result<(), HistogramError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }
    if block_size == 0 || block_size % 2 == 0 || block_size > src.cols().min(src.rows()) {
        return Err(HistogramError::InvalidBlockSize(block_size));
    }

    let integral = IntegralImage::from_image(src)?;
    let half = block_size / 2;
    let cols = src.cols();
    let rows = src.rows();
    let area = (block_size * block_size) as i64;

    let src_slice = src.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            if y < half || y + half >= rows {
                dst_row.fill(255);
                return;
            }
            for (x, out) in dst_row.iter_mut().enumerate() {
                if x < half || x + half >= cols {
                    *out = 255;
                    continue;
                }
                let sum = integral.corner_sum(x - half, y - half, x + half + 1, y + half + 1);
                let mean = sum as i64 / area;
                *out = if (src_slice[y * cols + x] as i64) < mean - delta {
                    0
                } else {
                    255
                };
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use winhist_image::{Image, ImageError, ImageSize};

    use super::adaptive_threshold_mean;
    use crate::error::HistogramError;

    #[test]
    fn uniform_image_stays_white() -> Result<(), HistogramError> {
        let size = ImageSize {
            width: 7,
            height: 6,
        };
        let image = Image::<u8, 1>::from_size_val(size, 90)?;
        let mut binary = Image::<u8, 1>::from_size_val(size, 0)?;

        adaptive_threshold_mean(&image, &mut binary, 3, 0)?;
        assert!(binary.as_slice().iter().all(|&v| v == 255));
        Ok(())
    }

    #[test]
    fn dark_spot_goes_black_border_stays_white() -> Result<(), HistogramError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut data = vec![200u8; 81];
        data[4 * 9 + 4] = 0;
        let image = Image::<u8, 1>::new(size, data)?;
        let mut binary = Image::<u8, 1>::from_size_val(size, 0)?;

        adaptive_threshold_mean(&image, &mut binary, 3, 10)?;

        // the dark center is well below its block mean
        assert_eq!(binary.get([4, 4, 0]), Some(&0u8));
        // its bright neighbors stay white
        assert_eq!(binary.get([4, 3, 0]), Some(&255u8));
        // border ring has no full block and is painted white
        assert!(binary.as_slice()[..9].iter().all(|&v| v == 255));
        assert!((0..9).all(|y| binary.get([y, 0, 0]) == Some(&255u8)));
        Ok(())
    }

    #[test]
    fn matches_brute_force_means() -> Result<(), HistogramError> {
        let size = ImageSize {
            width: 12,
            height: 10,
        };
        let data: Vec<u8> = (0..120).map(|i| (i * 53 % 256) as u8).collect();
        let image = Image::<u8, 1>::new(size, data)?;
        let mut binary = Image::<u8, 1>::from_size_val(size, 0)?;

        let block = 5;
        let delta = 7i64;
        adaptive_threshold_mean(&image, &mut binary, block, delta)?;

        let half = block / 2;
        for y in half..(10 - half) {
            for x in half..(12 - half) {
                let mut sum = 0i64;
                for by in (y - half)..=(y + half) {
                    for bx in (x - half)..=(x + half) {
                        sum += image.as_slice()[by * 12 + bx] as i64;
                    }
                }
                let mean = sum / (block * block) as i64;
                let expected = if (image.as_slice()[y * 12 + x] as i64) < mean - delta {
                    0
                } else {
                    255
                };
                assert_eq!(binary.get([y, x, 0]), Some(&expected));
            }
        }
        Ok(())
    }

    #[test]
    fn invalid_arguments_are_rejected() -> Result<(), HistogramError> {
        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let image = Image::<u8, 1>::from_size_val(size, 0)?;
        let mut small = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        assert!(matches!(
            adaptive_threshold_mean(&image, &mut small, 3, 0),
            Err(HistogramError::Image(ImageError::InvalidImageSize(
                8, 8, 4, 4
            )))
        ));

        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        for bad in [0, 4, 9, 11] {
            assert!(matches!(
                adaptive_threshold_mean(&image, &mut dst, bad, 0),
                Err(HistogramError::InvalidBlockSize(b)) if b == bad
            ));
        }
        Ok(())
    }
}
