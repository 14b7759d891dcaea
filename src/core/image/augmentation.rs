//! Augmentation pipeline used when oversampling a class.
//!
//! Every oversampled copy goes through the same fixed sequence:
//! 1. Horizontal flip (50% probability)
//! 2. Rotation, uniform in [-10°, +10°], bilinear with black fill
//! 3. Gaussian blur, sigma uniform in [0, 1.0]
//! 4. Additive Gaussian noise, std uniform in [0, 0.05 * 255]
//!
//! The output always has the dimensions of the input and is 8-bit RGB.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::Rng;
use tracing::debug;

use crate::core::error::Result;
use crate::core::operations::{encodable_for, read_image, write_image};

/// Blur sigmas below this leave the image untouched
pub const MIN_BLUR_SIGMA: f32 = 1e-3;

/// Augmentation configuration parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationConfig {
    /// Probability of a horizontal flip
    pub horizontal_flip_prob: f32,
    /// Maximum absolute rotation in degrees
    pub max_rotation_degrees: f32,
    /// Upper bound of the blur sigma range
    pub max_blur_sigma: f32,
    /// Upper bound of the per-pixel noise standard deviation (0-255 scale)
    pub max_noise_std: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            horizontal_flip_prob: 0.5,
            max_rotation_degrees: 10.0,
            max_blur_sigma: 1.0,
            max_noise_std: 0.05 * 255.0,
        }
    }
}

impl AugmentationConfig {
    /// Configuration that leaves pixels unchanged
    pub fn none() -> Self {
        Self {
            horizontal_flip_prob: 0.0,
            max_rotation_degrees: 0.0,
            max_blur_sigma: 0.0,
            max_noise_std: 0.0,
        }
    }
}

/// Parameters drawn for a single augmented copy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentationParams {
    pub flip: bool,
    pub rotation_degrees: f32,
    pub blur_sigma: f32,
    pub noise_std: f32,
}

/// Applies the randomized augmentation pipeline
#[derive(Debug, Clone, Default)]
pub struct Augmenter {
    config: AugmentationConfig,
}

impl Augmenter {
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    /// Draw the parameters for one augmented copy
    pub fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> AugmentationParams {
        let flip = rng.gen::<f32>() < self.config.horizontal_flip_prob;
        let rotation_degrees = symmetric_range(rng, self.config.max_rotation_degrees);
        let blur_sigma = upper_range(rng, self.config.max_blur_sigma);
        let noise_std = upper_range(rng, self.config.max_noise_std);

        AugmentationParams {
            flip,
            rotation_degrees,
            blur_sigma,
            noise_std,
        }
    }

    /// Draw fresh parameters and augment the image
    pub fn augment<R: Rng + ?Sized>(&self, img: &DynamicImage, rng: &mut R) -> DynamicImage {
        let params = self.sample_params(rng);
        self.apply(img, &params, rng)
    }

    /// Run the pipeline with the given parameters.
    ///
    /// `rng` is only consumed by the noise step.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        img: &DynamicImage,
        params: &AugmentationParams,
        rng: &mut R,
    ) -> DynamicImage {
        let mut rgb = img.to_rgb8();

        if params.flip {
            image::imageops::flip_horizontal_in_place(&mut rgb);
        }

        if params.rotation_degrees.abs() > f32::EPSILON {
            rgb = rotate_about_center(
                &rgb,
                params.rotation_degrees.to_radians(),
                Interpolation::Bilinear,
                Rgb([0u8, 0u8, 0u8]),
            );
        }

        if params.blur_sigma >= MIN_BLUR_SIGMA {
            rgb = gaussian_blur_f32(&rgb, params.blur_sigma);
        }

        if params.noise_std > 0.0 {
            add_gaussian_noise(&mut rgb, params.noise_std, rng);
        }

        DynamicImage::ImageRgb8(rgb)
    }

    /// Read `source`, augment it, and write the result to `destination`
    /// in the source's encoding
    pub fn augment_file<R: Rng + ?Sized>(
        &self,
        source: &Path,
        destination: &Path,
        rng: &mut R,
    ) -> Result<AugmentationParams> {
        let (img, format) = read_image(source)?;
        let params = self.sample_params(rng);
        let augmented = encodable_for(self.apply(&img, &params, rng), format);
        write_image(destination, &augmented, format)?;

        debug!(
            "Augmented {:?} -> {:?} (flip={}, rotate={:.2}, blur={:.3}, noise={:.2})",
            source,
            destination,
            params.flip,
            params.rotation_degrees,
            params.blur_sigma,
            params.noise_std
        );

        Ok(params)
    }
}

fn symmetric_range<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}

fn upper_range<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen_range(0.0..=max)
    } else {
        0.0
    }
}

/// Add zero-mean Gaussian noise, one sample per pixel shared by all channels
fn add_gaussian_noise<R: Rng + ?Sized>(img: &mut RgbImage, std: f32, rng: &mut R) {
    for pixel in img.pixels_mut() {
        // Box-Muller; u1 is kept in (0, 1] so ln never sees zero
        let u1: f32 = 1.0 - rng.gen::<f32>();
        let u2: f32 = rng.gen();
        let noise = std * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();

        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 + noise).round().clamp(0.0, 255.0) as u8;
        }
    }
}
