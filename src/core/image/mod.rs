mod augmentation;
mod preprocess;

pub use augmentation::{AugmentationConfig, AugmentationParams, Augmenter, MIN_BLUR_SIGMA};
pub use preprocess::{load_and_prep_image, prep_image, PreparedImage, DEFAULT_IMAGE_SHAPE};
