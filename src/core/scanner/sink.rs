// src/core/scanner/sink.rs

use crate::core::models::{ProbeResult, ScanSummary};
use color_eyre::eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where result lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// What the sink saw once the channel closed.
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    pub written: usize,
    pub write_failures: usize,
    pub summary: ScanSummary,
}

/// Streams result lines to their destination as they arrive.
pub struct ResultSink {
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl ResultSink {
    /// Opens the destination. A file is created or truncated here, once;
    /// every result is then appended to it.
    pub async fn open(destination: Destination) -> Result<Self> {
        let writer: Box<dyn AsyncWrite + Send + Unpin> = match &destination {
            Destination::Stdout => Box::new(tokio::io::stdout()),
            Destination::File(path) => Box::new(create_output(path).await?),
        };
        Ok(Self { writer })
    }

    /// Drains `rx` until every sender is gone.
    ///
    /// A failed write is logged and counted but does not stop the drain, so
    /// no in-flight result is left behind in the channel.
    pub async fn drain(mut self, mut rx: mpsc::Receiver<ProbeResult>) -> SinkReport {
        let mut report = SinkReport::default();
        while let Some(result) = rx.recv().await {
            report.summary.record(&result.outcome);
            match self.write_line(&result.line).await {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(url = %result.url, error = %e, "Failed to write result line.");
                    report.write_failures += 1;
                }
            }
        }
        debug!(written = report.written, failures = report.write_failures, "Result channel closed.");
        if let Err(e) = self.writer.shutdown().await {
            warn!(error = %e, "Failed to close result output.");
        }
        report
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

async fn create_output(path: &Path) -> Result<tokio::fs::File> {
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .wrap_err_with(|| format!("Error opening output file {}", path.display()))?;
    info!(path = %path.display(), "Writing results to file.");
    Ok(file)
}
