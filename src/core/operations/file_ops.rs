use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, error, info, warn};

use crate::core::error::{BalanceError, Result};

/// Decode an image from disk.
///
/// The format is detected from the file content first and the extension
/// second, and is returned alongside the pixels so copies can be written
/// back in the same encoding.
///
/// # Arguments
/// * `path` - Path to the image file
///
/// # Returns
/// * `Ok((image, format))` if decoding succeeded
/// * `Err(BalanceError)` if the file is unreadable or not a decodable image
pub fn read_image(path: &Path) -> Result<(DynamicImage, Option<ImageFormat>)> {
    debug!("Reading image {:?}", path);

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| {
            error!("Failed to open image {:?}: {}", path, e);
            BalanceError::io(path, e)
        })?;

    let format = reader.format();
    let image = reader.decode().map_err(|e| {
        error!("Failed to decode image {:?}: {}", path, e);
        BalanceError::ImageDecode {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok((image, format))
}

/// Convert `image` to a colour type the encoder for `format` accepts.
///
/// Farbfeld only stores 16-bit RGBA, and Radiance HDR and OpenEXR only
/// store 32-bit float. Other formats take the image as it is.
pub fn encodable_for(image: DynamicImage, format: Option<ImageFormat>) -> DynamicImage {
    match format {
        Some(ImageFormat::Farbfeld) => DynamicImage::ImageRgba16(image.to_rgba16()),
        Some(ImageFormat::Hdr) | Some(ImageFormat::OpenExr) => {
            DynamicImage::ImageRgb32F(image.to_rgb32f())
        }
        _ => image,
    }
}

/// Encode an image to disk.
///
/// Uses `format` when known, otherwise infers the encoding from the
/// destination extension. The destination is removed again if encoding
/// fails, so no partial file is left behind.
pub fn write_image(path: &Path, image: &DynamicImage, format: Option<ImageFormat>) -> Result<()> {
    let result = match format {
        Some(format) => image.save_with_format(path, format),
        None => image.save(path),
    };

    if let Err(e) = result {
        error!("Failed to write image {:?}: {}", path, e);
        if path.exists() {
            if let Err(remove_err) = fs::remove_file(path) {
                warn!("Failed to remove partial file {:?}: {}", path, remove_err);
            }
        }
        return Err(BalanceError::ImageEncode {
            path: path.to_path_buf(),
            source: e,
        });
    }

    debug!("Wrote image {:?}", path);
    Ok(())
}

/// Permanently delete a file.
pub fn delete_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| {
        error!("Failed to delete {:?}: {}", path, e);
        BalanceError::io(path, e)
    })?;

    info!("Deleted {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn create_test_image(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 20) as u8, (y * 20) as u8, 128u8])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_read_image_detects_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.png");
        create_test_image(&path, 8, 6);

        let (image, format) = read_image(&path).unwrap();
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 6);
        assert_eq!(format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_read_image_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_image(&temp_dir.path().join("missing.png"));
        assert!(matches!(result, Err(BalanceError::Io { .. })));
    }

    #[test]
    fn test_read_image_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = read_image(&path);
        assert!(matches!(result, Err(BalanceError::ImageDecode { .. })));
    }

    #[test]
    fn test_write_image_with_source_format() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.png");
        create_test_image(&source, 5, 5);

        let (image, format) = read_image(&source).unwrap();
        let dest = temp_dir.path().join("copy.png");
        write_image(&dest, &image, format).unwrap();

        let (copy, _) = read_image(&dest).unwrap();
        assert_eq!(copy.to_rgb8(), image.to_rgb8());
    }

    #[test]
    fn test_encodable_for_high_depth_formats() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.png");
        create_test_image(&source, 4, 3);
        let (image, _) = read_image(&source).unwrap();

        for (name, format) in [
            ("copy.ff", ImageFormat::Farbfeld),
            ("copy.hdr", ImageFormat::Hdr),
        ] {
            let dest = temp_dir.path().join(name);
            let converted = encodable_for(DynamicImage::ImageRgb8(image.to_rgb8()), Some(format));
            write_image(&dest, &converted, Some(format)).unwrap();

            let (copy, detected) = read_image(&dest).unwrap();
            assert_eq!(detected, Some(format));
            assert_eq!((copy.width(), copy.height()), (4, 3));
        }
    }

    #[test]
    fn test_encodable_for_keeps_8bit_formats() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::new(2, 2));
        let kept = encodable_for(image.clone(), Some(ImageFormat::Png));
        assert_eq!(kept, image);
    }

    #[test]
    fn test_write_image_failure_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("copy.dds");
        let image = DynamicImage::ImageRgb8(ImageBuffer::new(2, 2));

        // No DDS encoder exists
        let result = write_image(&dest, &image, Some(ImageFormat::Dds));
        assert!(matches!(result, Err(BalanceError::ImageEncode { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn test_delete_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("victim.png");
        create_test_image(&path, 2, 2);

        delete_file(&path).unwrap();
        assert!(!path.exists());
        assert!(delete_file(&path).is_err());
    }
}
