//! Logging for the dataset balancer
//!
//! - Custom bracketed event formatting
//! - Dual output (log file + stdout)
//! - One timestamped log file per run

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{log_file_name, setup_logging};
