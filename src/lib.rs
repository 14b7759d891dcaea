//! Class-folder dataset balancing.
//!
//! Brings every class folder of an image classification dataset to the same
//! number of files: small classes are oversampled with augmented copies,
//! large classes are undersampled by deleting random files.

pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::analysis::{balance, balance_with_config, BalanceConfig, BalanceSummary};
pub use crate::core::error::{BalanceError, Result};
