use turnscan_core::{BoundedPointList, CameraId, CapacityError, Pixel2d, Point3d};

use crate::calibration::CameraCalibration;

/// Session-wide parameters of the triangulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangulationParams {
    /// Number of steps in a full turntable revolution.
    pub rev_steps: u32,
    /// Minimum height above the base row, in pixels, for a point to be kept.
    pub base_safe_height: f64,
    /// Width of the frames in pixels, used to normalize the coordinates.
    pub image_width: usize,
}

impl Default for TriangulationParams {
    fn default() -> Self {
        Self {
            rev_steps: 160,
            base_safe_height: 1.0,
            image_width: 640,
        }
    }
}

/// Why a laser centroid could not be triangulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The centroid lies on the vanishing point column.
    VanishingColumn,
    /// The centroid lies on the secondary vanishing point column.
    SecondaryVanishingColumn,
    /// The centroid lies beyond the calibrated wall edge.
    BeyondWallEdge,
    /// The estimated height is not above the base by the safety margin.
    BelowBase,
}

/// Outcome of triangulating a single centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Triangulated {
    /// The centroid maps to an object space point.
    Accepted(Point3d),
    /// The centroid was classified invalid.
    Rejected(Rejection),
}

impl Triangulated {
    /// The point stored for this outcome: rejected candidates become zeroed points.
    pub fn into_point(self, step: u32) -> Point3d {
        match self {
            Triangulated::Accepted(p) => p,
            Triangulated::Rejected(_) => Point3d::zeroed(step),
        }
    }
}

/// Counts of one [`translate_points`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranslateSummary {
    /// Centroids mapped to object space.
    pub accepted: usize,
    /// Centroids stored as zeroed points.
    pub rejected: usize,
}

impl TranslateSummary {
    /// Total number of centroids consumed.
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Turntable angle of a step for the given camera, in radians.
pub fn step_angle(camera: CameraId, step: u32, rev_steps: u32, calib: &CameraCalibration) -> f64 {
    let angle = 2.0 * std::f64::consts::PI * step as f64 / rev_steps as f64;
    match camera {
        CameraId::A => angle,
        CameraId::B => angle + calib.angle_offset,
    }
}

// infinities and NaN collapse to zero
#[inline]
fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Triangulate a single laser centroid.
///
/// The image row is back-projected through the vanishing point to an object height at
/// the base column, the drop line gives the radius on the turntable plane and the step
/// angle rotates it into scanner space. Coordinates are divided by half the image
/// width.
///
/// # Arguments
///
/// * `pixel` - The laser centroid.
/// * `camera` - The camera that saw the centroid.
/// * `step` - The rotation step of the frame.
/// * `calib` - The camera calibration.
/// * `params` - The session parameters.
pub fn triangulate_point(
    pixel: &Pixel2d,
    camera: CameraId,
    step: u32,
    calib: &CameraCalibration,
    params: &TriangulationParams,
) -> Triangulated {
    let img_x = pixel.x as f64;
    let img_y = pixel.y as f64;

    let vp_x = calib.vp_x as f64;
    let vp_y = calib.vp_y as f64;
    let base_x = calib.base_x as f64;
    let base_y = calib.base_y as f64;

    // degenerate projections
    if img_x == vp_x {
        return Triangulated::Rejected(Rejection::VanishingColumn);
    }
    if img_x == calib.vvp_x as f64 {
        return Triangulated::Rejected(Rejection::SecondaryVanishingColumn);
    }
    if calib.is_beyond_wall(img_x) {
        return Triangulated::Rejected(Rejection::BeyondWallEdge);
    }

    // height: line through the vanishing point evaluated at the base column
    let slope = (vp_y - img_y) / (vp_x - img_x);
    let img_int = vp_y - vp_x * slope;
    let z_int = base_x * slope + img_int;

    if z_int <= base_y + params.base_safe_height {
        return Triangulated::Rejected(Rejection::BelowBase);
    }

    // radius on the turntable plane from the drop line
    let y_drop = calib.drop_row(img_x);
    let hyp = ((base_x - img_x).powi(2) + (base_y - y_drop).powi(2)).sqrt();

    let angle = step_angle(camera, step, params.rev_steps, calib);
    let side = if img_x > base_x { -1.0 } else { 1.0 };
    let x = side * hyp * angle.sin();
    let y = side * hyp * angle.cos();

    let half_width = params.image_width as f64 / 2.0;

    Triangulated::Accepted(Point3d::new(
        sanitize(x / half_width),
        sanitize(y / half_width),
        sanitize((z_int - base_y) / half_width),
        step,
    ))
}

/// Translate the centroids appended since the last call into object space points.
///
/// Consumes `src[*cursor..]`, appends one point per centroid to `dst` (zeroed for
/// rejected candidates) and advances `cursor`. Calling again without new centroids is
/// a no-op. Calls for one camera must come in non-decreasing step order, every
/// pending centroid is tagged with `step`.
///
/// # Errors
///
/// [`CapacityError`] if `dst` fills up. `cursor` then counts the centroids whose
/// point was stored.
pub fn translate_points(
    camera: CameraId,
    step: u32,
    calib: &CameraCalibration,
    params: &TriangulationParams,
    src: &BoundedPointList<Pixel2d>,
    cursor: &mut usize,
    dst: &mut BoundedPointList<Point3d>,
) -> Result<TranslateSummary, CapacityError> {
    let pending = src.as_slice().get(*cursor..).unwrap_or_default();
    let mut summary = TranslateSummary::default();

    for pixel in pending {
        let outcome = triangulate_point(pixel, camera, step, calib, params);
        match outcome {
            Triangulated::Accepted(_) => summary.accepted += 1,
            Triangulated::Rejected(reason) => {
                log::trace!("{camera}: rejected {pixel:?} ({reason:?})");
                summary.rejected += 1;
            }
        }
        dst.push(outcome.into_point(step))?;
        *cursor += 1;
    }

    log::debug!(
        "{camera}: step {step} translated {} points ({} rejected)",
        summary.total(),
        summary.rejected
    );

    Ok(summary)
}
