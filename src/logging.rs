// src/logging.rs

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    /// `SUBCHECK_RS_LOGLEVEL`, read when `RUST_LOG` is unset.
    static ref LEVEL_VAR: String = format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase());
    /// Rewritten on every run so each scan starts a fresh log.
    static ref SCAN_LOG: String = format!("{}-scan.log", env!("CARGO_PKG_NAME"));
}

/// Where scan logs go: the platform's local data directory for this tool,
/// or `./.data` when no home directory can be found.
pub fn log_directory() -> PathBuf {
    ProjectDirs::from("com", "subcheck-rs", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

/// Installs the global subscriber and returns the path of the log file.
///
/// Events always go to the scan log. With `verbose` they are mirrored to
/// stderr with a local wall-clock timestamp, so they interleave with the
/// result lines printed on stdout.
pub fn initialize_logging(verbose: bool) -> Result<PathBuf> {
    let directory = log_directory();
    std::fs::create_dir_all(&directory)
        .wrap_err_with(|| format!("cannot create log directory {}", directory.display()))?;
    let log_path = directory.join(SCAN_LOG.as_str());
    let log_file = std::fs::File::create(&log_path)
        .wrap_err_with(|| format!("cannot create log file {}", log_path.display()))?;

    let directives = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LEVEL_VAR.as_str()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(LocalTime::new(format_description!("[hour]:[minute]:[second]")))
            .with_filter(EnvFilter::new(&directives))
    });
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(ErrorLayer::default())
        .try_init()
        .wrap_err("a global tracing subscriber is already installed")?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_log_is_named_after_the_binary() {
        assert_eq!(SCAN_LOG.as_str(), "subcheck-rs-scan.log");
        assert_eq!(LEVEL_VAR.as_str(), "SUBCHECK_RS_LOGLEVEL");
    }

    #[test]
    fn log_directory_is_specific_to_this_tool() {
        let dir = log_directory();
        let tail = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(tail == ".data" || tail.contains("subcheck-rs"), "got {}", dir.display());
    }
}
