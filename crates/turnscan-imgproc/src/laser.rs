use turnscan_core::{BoundedPointList, CapacityError, Pixel2d};
use turnscan_image::{Image, ImageError, ImageSize};

/// An error type for the laser extraction.
#[derive(thiserror::Error, Debug)]
pub enum LaserError {
    /// The frame does not have the configured resolution.
    #[error("Image dimensions inconsistent with calibration settings: got {0}, expected {1}")]
    InvalidImageSize(ImageSize, ImageSize),

    /// The row stride must be at least one.
    #[error("Row stride must be greater than zero")]
    InvalidRowStride,

    /// The 2D point list is full.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// Error accessing the image data.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Per-channel laser intensity thresholds.
///
/// The thresholds are indexed by the channel position in the frame storage, not by
/// color name. For BMP frames position 0 holds blue, 1 green and 2 red.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaserThresholds(pub [u8; 3]);

impl LaserThresholds {
    /// A pixel is laser positive when every channel is strictly above its threshold.
    #[inline]
    pub fn is_laser(&self, pixel: &[u8]) -> bool {
        pixel.iter().zip(self.0.iter()).all(|(v, t)| v > t)
    }
}

impl Default for LaserThresholds {
    fn default() -> Self {
        Self([75, 75, 150])
    }
}

/// Parameters of the laser stripe extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaserParams {
    /// Process every `row_stride`-th row, starting at row 0.
    pub row_stride: usize,
    /// Per-channel intensity thresholds.
    pub thresholds: LaserThresholds,
}

impl Default for LaserParams {
    fn default() -> Self {
        Self {
            row_stride: 1,
            thresholds: LaserThresholds::default(),
        }
    }
}

/// Extract the laser stripe centroids of a frame.
///
/// Every processed row is scanned left to right. A run of laser positive pixels
/// spanning columns `a..=b` and closed by a non positive pixel yields one centroid at
/// column `(a + b) / 2` (integer division) on that row. A run still open at the end
/// of the row is dropped.
///
/// # Arguments
///
/// * `src` - The frame, three channels in storage order.
/// * `expected_size` - The resolution the calibration was made for.
/// * `params` - The row stride and channel thresholds.
/// * `dst` - The list the centroids are appended to.
///
/// # Returns
///
/// The number of centroids appended.
///
/// # Errors
///
/// [`LaserError::InvalidImageSize`] if the frame resolution differs from `expected_size`,
/// [`LaserError::Capacity`] if `dst` runs out of space. Points appended before the
/// list filled up are kept.
///
/// # Examples
///
/// ```
/// use turnscan_core::BoundedPointList;
/// use turnscan_image::Image;
/// use turnscan_imgproc::laser::{extract_laser_points, LaserParams};
///
/// let mut frame = Image::<u8, 3>::from_size_val([6, 1].into(), 0).unwrap();
/// frame.set_pixel(2, 0, [255, 255, 255]).unwrap();
/// frame.set_pixel(3, 0, [255, 255, 255]).unwrap();
///
/// let mut points = BoundedPointList::new(16);
/// let n = extract_laser_points(&frame, frame.size(), &LaserParams::default(), &mut points).unwrap();
///
/// assert_eq!(n, 1);
/// assert_eq!(points.as_slice()[0].x, 2);
/// ```
pub fn extract_laser_points(
    src: &Image<u8, 3>,
    expected_size: ImageSize,
    params: &LaserParams,
    dst: &mut BoundedPointList<Pixel2d>,
) -> Result<usize, LaserError> {
    if src.size() != expected_size {
        return Err(LaserError::InvalidImageSize(src.size(), expected_size));
    }

    if params.row_stride == 0 {
        return Err(LaserError::InvalidRowStride);
    }

    let num_before = dst.len();

    for y in (0..src.rows()).step_by(params.row_stride) {
        let row = src.row(y)?;
        let mut run_start = None;

        for (x, pixel) in row.chunks_exact(3).enumerate() {
            let positive = params.thresholds.is_laser(pixel);
            match (run_start, positive) {
                (None, true) => run_start = Some(x),
                (Some(start), false) => {
                    // the run ended on the previous column
                    dst.push(Pixel2d::new((start + x - 1) / 2, y))?;
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    Ok(dst.len() - num_before)
}
