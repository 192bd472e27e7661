use std::path::Path;

use turnscan_image::{Frame, Image, ImageSize};

use crate::error::IoError;

/// Reads a BMP frame from the given file path.
///
/// The decoded pixels are laid out the way a 24-bit BMP stores them: the first
/// row of the frame is the bottom row of the picture and each pixel is stored as
/// `[B, G, R]`. Laser thresholds and calibration constants are expressed in that
/// layout.
///
/// # Arguments
///
/// * `file_path` - The path to a `.bmp` file.
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`] if the file is missing, [`IoError::ImageDecodeError`]
/// if it cannot be decoded.
pub fn read_image_bmp(file_path: impl AsRef<Path>) -> Result<Frame, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists and is a BMP
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path
        .extension()
        .map_or(true, |ext| ext.to_ascii_lowercase() != "bmp")
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(&file_path)?;

    let img = image::ImageReader::with_format(std::io::Cursor::new(bytes), image::ImageFormat::Bmp)
        .decode()?
        .into_rgb8();

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, rgb_top_down_to_storage(size, img.as_raw()))?)
}

/// Writes a frame to a 24-bit BMP file.
///
/// The frame must be in BMP storage layout, as returned by [`read_image_bmp`].
///
/// # Arguments
///
/// * `file_path` - The path to the BMP file.
/// * `frame` - The frame to write.
pub fn write_image_bmp(file_path: impl AsRef<Path>, frame: &Frame) -> Result<(), IoError> {
    let size = frame.size();
    let (Ok(width), Ok(height)) = (u32::try_from(size.width), u32::try_from(size.height)) else {
        return Err(IoError::FrameTooLarge(size.width, size.height));
    };

    // the conversion is its own inverse
    let rgb = rgb_top_down_to_storage(size, frame.as_slice());

    image::save_buffer_with_format(
        file_path,
        &rgb,
        width,
        height,
        image::ExtendedColorType::Rgb8,
        image::ImageFormat::Bmp,
    )?;

    Ok(())
}

/// Swap the row order and the first and last channel of an interleaved 3 channel buffer.
fn rgb_top_down_to_storage(size: ImageSize, src: &[u8]) -> Vec<u8> {
    let stride = size.width * 3;
    if stride == 0 {
        return Vec::new();
    }
    let mut dst = Vec::with_capacity(src.len());
    for row in src.chunks_exact(stride).rev() {
        for px in row.chunks_exact(3) {
            dst.extend_from_slice(&[px[2], px[1], px[0]]);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_layout_swaps_rows_and_channels() {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let top_down = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let storage = rgb_top_down_to_storage(size, &top_down);
        assert_eq!(storage, vec![9, 8, 7, 12, 11, 10, 3, 2, 1, 6, 5, 4]);
        assert_eq!(rgb_top_down_to_storage(size, &storage), top_down);
    }

    #[test]
    fn read_write_bmp() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("0.bmp");

        let mut frame = Frame::from_size_val([5, 3].into(), 0)?;
        frame.set_pixel(1, 0, [10, 20, 30])?;
        frame.set_pixel(4, 2, [200, 100, 50])?;
        write_image_bmp(&file_path, &frame)?;

        let back = read_image_bmp(&file_path)?;
        assert_eq!(back.size(), frame.size());
        assert_eq!(back.as_slice(), frame.as_slice());

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_bmp("/definitely/not/here/0.bmp");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("0.png");
        std::fs::write(&file_path, b"not an image")?;
        let res = read_image_bmp(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }

    #[test]
    fn read_corrupted_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("0.bmp");
        std::fs::write(&file_path, b"BM garbage")?;
        let res = read_image_bmp(&file_path);
        assert!(matches!(res, Err(IoError::ImageDecodeError(_))));
        Ok(())
    }
}
