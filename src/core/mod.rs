pub mod analysis;
pub mod dataset;
pub mod error;
pub mod image;
pub mod operations;

pub use self::analysis::*;
pub use self::dataset::*;
pub use self::error::{BalanceError, Result};
pub use self::image::*;
pub use self::operations::*;
