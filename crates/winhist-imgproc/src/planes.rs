use rayon::prelude::*;

use winhist_image::{Image, ImageSize};

use crate::error::HistogramError;

/// A stack of binary indicator planes derived from a grayscale image.
///
/// The intensity range [0, 256) is split into `num_planes` equal bins and
/// plane `i` holds 1 at every pixel whose intensity falls into bin `i`, 0
/// elsewhere. At any pixel exactly one plane is set, so summing a plane over
/// a region counts the pixels of that bin.
///
/// The planes are stored plane-major: plane `i` occupies the `i`-th
/// `width * height` chunk of the backing buffer.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize};
/// use winhist_imgproc::planes::BinaryPlanes;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0, 64, 128, 192],
/// ).unwrap();
///
/// let planes = BinaryPlanes::from_image(&image, 4).unwrap();
/// assert_eq!(planes.num_planes(), 4);
/// assert_eq!(planes.plane(0).unwrap(), &[1, 0, 0, 0]);
/// assert_eq!(planes.plane(3).unwrap(), &[0, 0, 0, 1]);
/// ```
pub struct BinaryPlanes {
    data: Vec<u8>,
    num_planes: usize,
    shift: usize,
    size: ImageSize,
}

impl BinaryPlanes {
    /// Decompose an 8-bit grayscale image into binary bin-indicator planes.
    ///
    /// # Arguments
    ///
    /// * `src` - The source grayscale image.
    /// * `num_planes` - The number of intensity bins, a power of two in [1, 256].
    ///
    /// # Errors
    ///
    /// Returns an error if `num_planes` is not a power of two in [1, 256] or
    /// if the image is empty. Both are checked before any plane is allocated.
    pub fn from_image(src: &Image<u8, 1>, num_planes: usize) -> Result<Self, HistogramError> {
        if num_planes == 0 || num_planes > 256 || !num_planes.is_power_of_two() {
            return Err(HistogramError::InvalidPlaneCount(num_planes));
        }
        if src.width() == 0 || src.height() == 0 {
            return Err(HistogramError::EmptyImage(src.width(), src.height()));
        }

        // eliminate the low-order bits so that bin = intensity >> shift
        let shift = 8 - num_planes.trailing_zeros() as usize;

        let plane_len = src.width() * src.height();
        let mut data = vec![0u8; plane_len * num_planes];

        let src_slice = src.as_slice();
        data.par_chunks_exact_mut(plane_len)
            .enumerate()
            .for_each(|(bin, plane)| {
                plane
                    .iter_mut()
                    .zip(src_slice.iter())
                    .for_each(|(dst, &px)| {
                        *dst = u8::from((px as usize) >> shift == bin);
                    });
            });

        Ok(Self {
            data,
            num_planes,
            shift,
            size: src.size(),
        })
    }

    /// Get the number of planes in the stack.
    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    /// Get the size of each plane in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the bin index an intensity value maps to.
    pub fn bin_of(&self, intensity: u8) -> usize {
        (intensity as usize) >> self.shift
    }

    /// Get one plane as a flat row-major slice of 0/1 values.
    ///
    /// # Errors
    ///
    /// Returns an error if `bin` is not a valid plane index.
    pub fn plane(&self, bin: usize) -> Result<&[u8], HistogramError> {
        if bin >= self.num_planes {
            return Err(HistogramError::InvalidBinIndex(bin, self.num_planes));
        }
        let plane_len = self.size.width * self.size.height;
        Ok(&self.data[bin * plane_len..(bin + 1) * plane_len])
    }

    /// Get the whole plane-major buffer as a flat slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
