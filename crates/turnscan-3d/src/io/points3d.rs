use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use turnscan_core::{CameraId, Point3d};

use crate::pointcloud::ScanCloud;

/// Error types for the `.3dps` module.
#[derive(Debug, thiserror::Error)]
pub enum PointsIoError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    Io(#[from] std::io::Error),

    /// Invalid file extension
    #[error("Invalid 3dps file extension. Got:{0}")]
    InvalidFileExtension(String),

    /// Parse error
    #[error("Parse error {0}")]
    ParseError(String),

    /// The file ends before all announced points were read.
    #[error("Expected {expected} points for {camera}, found {found}")]
    MissingPoints {
        /// The camera whose block is short.
        camera: CameraId,
        /// Number of points announced in the header.
        expected: usize,
        /// Number of complete points read.
        found: usize,
    },
}

fn check_extension(path: &Path) -> Result<(), PointsIoError> {
    let Some(file_ext) = path.extension() else {
        return Err(PointsIoError::InvalidFileExtension("".into()));
    };

    if file_ext != "3dps" {
        return Err(PointsIoError::InvalidFileExtension(
            file_ext.to_string_lossy().to_string(),
        ));
    }

    Ok(())
}

/// Write a scan cloud to a `.3dps` file.
///
/// The format is plain text: the point count of camera A, the point count of camera B,
/// then four lines per point (`x`, `y`, `z` with six decimals and the integer step),
/// camera A first.
///
/// # Arguments
///
/// * `path` - Path to a `.3dps` file, created or truncated.
/// * `cloud` - The points to write.
pub fn write_points3d(path: impl AsRef<Path>, cloud: &ScanCloud) -> Result<(), PointsIoError> {
    check_extension(path.as_ref())?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_points3d_to(&mut writer, cloud)?;
    writer.flush()?;
    Ok(())
}

/// Write a scan cloud in the `.3dps` text format to a writer.
pub fn write_points3d_to<W: Write>(writer: &mut W, cloud: &ScanCloud) -> Result<(), PointsIoError> {
    writeln!(writer, "{}", cloud.points(CameraId::A).len())?;
    writeln!(writer, "{}", cloud.points(CameraId::B).len())?;

    for camera in CameraId::ALL {
        for p in cloud.points(camera) {
            writeln!(writer, "{:.6}\n{:.6}\n{:.6}\n{}", p.x, p.y, p.z, p.step)?;
        }
    }

    Ok(())
}

/// Read a scan cloud from a `.3dps` file.
///
/// # Arguments
///
/// * `path` - Path to a `.3dps` file.
///
/// # Returns
///
/// The points of both cameras, in file order.
pub fn read_points3d(path: impl AsRef<Path>) -> Result<ScanCloud, PointsIoError> {
    check_extension(path.as_ref())?;
    let file = File::open(path)?;
    let cloud = read_points3d_from(BufReader::new(file))?;
    log::info!("File load completed: {} points", cloud.len());
    Ok(cloud)
}

/// Read a scan cloud in the `.3dps` text format from a reader.
pub fn read_points3d_from<R: BufRead>(mut reader: R) -> Result<ScanCloud, PointsIoError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let mut tokens = content.split_whitespace();

    let num_a: usize = parse_part(tokens.next(), "camera A count")?;
    let num_b: usize = parse_part(tokens.next(), "camera B count")?;

    let camera_a = read_block(&mut tokens, CameraId::A, num_a)?;
    let camera_b = read_block(&mut tokens, CameraId::B, num_b)?;

    if tokens.next().is_some() {
        log::warn!("Ignoring trailing data after {} points", num_a + num_b);
    }

    Ok(ScanCloud::new(camera_a, camera_b))
}

fn read_block<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    camera: CameraId,
    expected: usize,
) -> Result<Vec<Point3d>, PointsIoError> {
    // the count comes from the file, do not trust it for the allocation
    let mut points = Vec::with_capacity(expected.min(1 << 16));

    for found in 0..expected {
        let mut next = |what| match tokens.next() {
            Some(token) => Ok(token),
            None => {
                log::debug!("{camera}: missing {what} of point {found}");
                Err(PointsIoError::MissingPoints {
                    camera,
                    expected,
                    found,
                })
            }
        };
        let x = parse_part(Some(next("x")?), "x")?;
        let y = parse_part(Some(next("y")?), "y")?;
        let z = parse_part(Some(next("z")?), "z")?;
        let step = parse_part(Some(next("step")?), "step")?;
        points.push(Point3d::new(x, y, z, step));
    }

    Ok(points)
}

/// Utility function for parsing one token of the text format
fn parse_part<T: std::str::FromStr>(s: Option<&str>, what: &str) -> Result<T, PointsIoError>
where
    T::Err: std::fmt::Display,
{
    let s = s.ok_or_else(|| PointsIoError::ParseError(format!("missing {what}")))?;
    s.parse::<T>()
        .map_err(|e| PointsIoError::ParseError(format!("{what} '{s}': {e}")))
}
