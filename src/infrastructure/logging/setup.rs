use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone};
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;

const LOG_DIR: &str = "logs";

/// Log file name for a run started at `timestamp`
pub fn log_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("dataset_balancer_{}.log", timestamp.format("%Y%m%d_%H%M%S"))
}

fn default_filter() -> EnvFilter {
    // Our crate at trace, chatty GUI dependencies at warn
    ["winit", "log", "egui", "eframe"]
        .iter()
        .filter_map(|target| format!("{}=warn", target).parse::<Directive>().ok())
        .fold(EnvFilter::new("trace"), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Install the global subscriber: bracketed output to stdout and to a
/// fresh log file under `./logs`. Returns the log file path.
pub fn setup_logging() -> io::Result<PathBuf> {
    let log_dir = std::env::current_dir()?.join(LOG_DIR);
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(log_file_name(&chrono::Local::now()));
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    let file_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    info!("Starting dataset balancer");
    info!("Log file created at: {:?}", log_path);

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_log_file_name_uses_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            log_file_name(&timestamp),
            "dataset_balancer_20240309_140507.log"
        );
    }
}
