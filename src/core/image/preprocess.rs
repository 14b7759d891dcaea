//! Single-image preprocessing for model input.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::core::error::Result;
use crate::core::operations::read_image;

/// Default square input size
pub const DEFAULT_IMAGE_SHAPE: u32 = 224;

/// A resized RGB image stored as HWC `f32` samples
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    /// Side length of the square image
    pub size: u32,
    /// Interleaved RGB samples, row-major
    pub data: Vec<f32>,
}

impl PreparedImage {
    /// Tensor shape as `[height, width, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.size as usize, self.size as usize, 3]
    }

    /// RGB samples at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let idx = ((y * self.size + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Resize an in-memory image to `img_shape` x `img_shape` and convert it to
/// `f32` samples, rescaled to [0, 1] when `scale` is set.
pub fn prep_image(img: &DynamicImage, img_shape: u32, scale: bool) -> PreparedImage {
    let resized = img
        .resize_exact(img_shape, img_shape, FilterType::Triangle)
        .to_rgb8();

    let divisor = if scale { 255.0 } else { 1.0 };
    let data = resized
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| v as f32 / divisor)
        .collect();

    PreparedImage {
        size: img_shape,
        data,
    }
}

/// Read an image from disk and prepare it for model input
pub fn load_and_prep_image(path: &Path, img_shape: u32, scale: bool) -> Result<PreparedImage> {
    let (img, _) = read_image(path)?;
    Ok(prep_image(&img, img_shape, scale))
}
