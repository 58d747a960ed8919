use rayon::prelude::*;

use winhist_image::{Image, ImageSize, Rect};

use crate::error::HistogramError;
use crate::planes::BinaryPlanes;

/// Validate a rectangle against an image size and return its exclusive
/// corners `(x0, y0, x1, y1)`.
pub(crate) fn checked_corners(
    size: ImageSize,
    rect: &Rect,
) -> Result<(usize, usize, usize, usize), HistogramError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(HistogramError::InvalidRectSize(rect.width, rect.height));
    }
    let (x1, y1) = (rect.right(), rect.bottom());
    if x1 > size.width || y1 > size.height {
        return Err(HistogramError::RectOutOfBounds(
            x1,
            y1,
            size.width,
            size.height,
        ));
    }
    Ok((rect.x, rect.y, x1, y1))
}

/// Fill one summed-area table from a plane of scalar values.
///
/// `table` has `(width + 1) * (height + 1)` cells; row 0 and column 0 stay
/// zero and cell `(x, y)` receives the sum over `[0, x) x [0, y)`.
fn fill_table(table: &mut [u64], plane: &[u8], width: usize, height: usize) {
    let stride = width + 1;
    for y in 0..height {
        let mut row_sum = 0u64;
        for (x, &value) in plane[y * width..(y + 1) * width].iter().enumerate() {
            row_sum += value as u64;
            table[(y + 1) * stride + (x + 1)] = table[y * stride + (x + 1)] + row_sum;
        }
    }
}

/// A summed-area table over a grayscale image.
///
/// Construction scans the image once; afterwards the sum of the intensities
/// inside any axis-aligned rectangle is available from four table lookups.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize, Rect};
/// use winhist_imgproc::integral::IntegralImage;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 3,
///         height: 2,
///     },
///     vec![1, 2, 3, 4, 5, 6],
/// ).unwrap();
///
/// let integral = IntegralImage::from_image(&image).unwrap();
/// assert_eq!(integral.sum_rect(&Rect::new(0, 0, 3, 2)).unwrap(), 21);
/// assert_eq!(integral.sum_rect(&Rect::new(1, 1, 2, 1)).unwrap(), 11);
/// ```
pub struct IntegralImage {
    data: Vec<u64>,
    size: ImageSize,
}

impl IntegralImage {
    /// Build the summed-area table of a grayscale image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty.
    pub fn from_image(src: &Image<u8, 1>) -> Result<Self, HistogramError> {
        if src.width() == 0 || src.height() == 0 {
            return Err(HistogramError::EmptyImage(src.width(), src.height()));
        }

        let (width, height) = (src.width(), src.height());
        let mut data = vec![0u64; (width + 1) * (height + 1)];
        fill_table(&mut data, src.as_slice(), width, height);

        Ok(Self {
            data,
            size: src.size(),
        })
    }

    /// Get the size of the source image.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Sum of the intensities inside a rectangle, from four lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle has a zero side or extends beyond
    /// the image.
    pub fn sum_rect(&self, rect: &Rect) -> Result<u64, HistogramError> {
        let (x0, y0, x1, y1) = checked_corners(self.size, rect)?;
        Ok(self.corner_sum(x0, y0, x1, y1))
    }

    /// Sum of the intensities inside the square window of side
    /// `2 * radius + 1` centered at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the window falls outside the image.
    pub fn sum_window(&self, x: usize, y: usize, radius: usize) -> Result<u64, HistogramError> {
        let rect = Rect::centered(x, y, radius)
            .ok_or(HistogramError::WindowOutOfBounds(x, y, radius))?;
        match self.sum_rect(&rect) {
            Ok(sum) => Ok(sum),
            Err(_) => Err(HistogramError::WindowOutOfBounds(x, y, radius)),
        }
    }

    /// Four-corner lookup over exclusive corners known to be in bounds.
    ///
    /// Corner cells are monotone in both directions, so adding both positive
    /// terms first never underflows.
    pub(crate) fn corner_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let stride = self.size.width + 1;
        self.data[y1 * stride + x1] + self.data[y0 * stride + x0]
            - self.data[y0 * stride + x1]
            - self.data[y1 * stride + x0]
    }
}

/// Per-bin summed-area tables over the binary planes of a grayscale image.
///
/// Built once from a [`BinaryPlanes`] stack, the index answers "how many
/// pixels of bin `k` lie inside this rectangle" in constant time, and a full
/// N-bin histogram of any rectangle in O(N). The index is immutable after
/// construction, so queries are safe from concurrent threads.
///
/// # Example
///
/// ```
/// use winhist_image::{Image, ImageSize, Rect};
/// use winhist_imgproc::integral::IntegralHistogram;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0, 64, 128, 192],
/// ).unwrap();
///
/// let index = IntegralHistogram::from_image(&image, 4).unwrap();
/// let hist = index.histogram(&Rect::new(0, 0, 2, 2)).unwrap();
/// assert_eq!(hist, vec![1, 1, 1, 1]);
/// ```
pub struct IntegralHistogram {
    data: Vec<u64>,
    num_planes: usize,
    shift: usize,
    size: ImageSize,
}

impl IntegralHistogram {
    /// Build one summed-area table per plane of a binary plane stack.
    ///
    /// The tables are independent and are filled in parallel.
    pub fn from_planes(planes: &BinaryPlanes) -> Self {
        let ImageSize { width, height } = planes.size();
        let table_len = (width + 1) * (height + 1);
        let plane_len = width * height;

        let mut data = vec![0u64; table_len * planes.num_planes()];
        data.par_chunks_exact_mut(table_len)
            .zip(planes.as_slice().par_chunks_exact(plane_len))
            .for_each(|(table, plane)| {
                fill_table(table, plane, width, height);
            });

        Self {
            data,
            num_planes: planes.num_planes(),
            shift: 8 - planes.num_planes().trailing_zeros() as usize,
            size: planes.size(),
        }
    }

    /// Build the index directly from a grayscale image.
    ///
    /// # Arguments
    ///
    /// * `src` - The source grayscale image.
    /// * `num_bins` - The number of histogram bins, a power of two in [1, 256].
    ///
    /// # Errors
    ///
    /// Fails exactly where [`BinaryPlanes::from_image`] does, before any
    /// table is allocated.
    pub fn from_image(src: &Image<u8, 1>, num_bins: usize) -> Result<Self, HistogramError> {
        let planes = BinaryPlanes::from_image(src, num_bins)?;
        Ok(Self::from_planes(&planes))
    }

    /// Get the number of histogram bins indexed.
    pub fn num_bins(&self) -> usize {
        self.num_planes
    }

    /// Get the size of the indexed image.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the bin index an intensity value maps to.
    pub fn bin_of(&self, intensity: u8) -> usize {
        (intensity as usize) >> self.shift
    }

    /// Count the pixels of one bin inside a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if `bin` is out of range, or if the rectangle has a
    /// zero side or extends beyond the indexed image.
    pub fn bin_count(&self, bin: usize, rect: &Rect) -> Result<u64, HistogramError> {
        if bin >= self.num_planes {
            return Err(HistogramError::InvalidBinIndex(bin, self.num_planes));
        }
        let (x0, y0, x1, y1) = checked_corners(self.size, rect)?;
        Ok(self.plane_corner_sum(bin, x0, y0, x1, y1))
    }

    /// Compute the full per-bin histogram of a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle has a zero side or extends beyond
    /// the indexed image.
    pub fn histogram(&self, rect: &Rect) -> Result<Vec<u64>, HistogramError> {
        let mut hist = vec![0u64; self.num_planes];
        self.histogram_into(rect, &mut hist)?;
        Ok(hist)
    }

    /// Compute the full per-bin histogram of a rectangle into a caller
    /// provided buffer, overwriting its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length does not match the number of
    /// bins, or if the rectangle is invalid.
    pub fn histogram_into(&self, rect: &Rect, hist: &mut [u64]) -> Result<(), HistogramError> {
        if hist.len() != self.num_planes {
            return Err(HistogramError::InvalidHistogramLength(
                hist.len(),
                self.num_planes,
            ));
        }
        let (x0, y0, x1, y1) = checked_corners(self.size, rect)?;
        for (bin, count) in hist.iter_mut().enumerate() {
            *count = self.plane_corner_sum(bin, x0, y0, x1, y1);
        }
        Ok(())
    }

    /// Compute the full per-bin histogram of the square window of side
    /// `2 * radius + 1` centered at `(x, y)`.
    ///
    /// Equivalent to [`IntegralHistogram::histogram`] over the rectangle
    /// with top-left `(x - radius, y - radius)` and side `2 * radius + 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the window falls outside the image.
    pub fn histogram_window(
        &self,
        x: usize,
        y: usize,
        radius: usize,
    ) -> Result<Vec<u64>, HistogramError> {
        let rect = Rect::centered(x, y, radius)
            .ok_or(HistogramError::WindowOutOfBounds(x, y, radius))?;
        match self.histogram(&rect) {
            Ok(hist) => Ok(hist),
            Err(_) => Err(HistogramError::WindowOutOfBounds(x, y, radius)),
        }
    }

    fn plane_corner_sum(&self, bin: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let stride = self.size.width + 1;
        let table = &self.data[bin * stride * (self.size.height + 1)..];
        table[y1 * stride + x1] + table[y0 * stride + x0]
            - table[y0 * stride + x1]
            - table[y1 * stride + x0]
    }
}
