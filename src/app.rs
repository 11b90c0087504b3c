// src/app.rs

use crate::core::models::{ProbeMode, ScanSummary, Target};
use crate::core::palette::StatusPalette;
use crate::core::scanner::build_client;
use crate::core::scanner::dispatcher::{DispatchStats, Dispatcher};
use crate::core::scanner::probe::HttpProber;
use crate::core::scanner::sink::{Destination, ResultSink};
use crate::core::scanner::target::normalize_target;
use crate::core::wordlists::{default_candidates, load_candidates};
use chrono::{DateTime, Local};
use color_eyre::eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub url: Option<String>,
    pub list: Option<PathBuf>,
    pub domain: Option<String>,
    pub destination: Destination,
    pub concurrency: usize,
    pub mode: ProbeMode,
    pub timeout: Duration,
    pub color: bool,
}

/// Everything a probe run reports back once the sink has drained.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub target: Target,
    pub dispatch: DispatchStats,
    pub summary: ScanSummary,
    pub written: usize,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
}

impl ScanOutcome {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished.signed_duration_since(self.started)
    }
}

/// One probe run: candidates loaded and output opened, ready to go.
///
/// Building a session touches only the local filesystem, so a bad list path
/// or output path is reported before any request is sent.
pub struct ScanSession {
    url: String,
    candidates: Vec<String>,
    sink: ResultSink,
    concurrency: usize,
    mode: ProbeMode,
    timeout: Duration,
    palette: Arc<StatusPalette>,
}

impl ScanSession {
    pub async fn prepare(config: &ScanConfig, url: &str) -> Result<Self> {
        let candidates = match &config.list {
            Some(path) => load_candidates(path).await?,
            None => default_candidates(config.mode),
        };
        let sink = ResultSink::open(config.destination.clone()).await?;
        let palette = if config.color { StatusPalette::ansi() } else { StatusPalette::plain() };

        Ok(Self {
            url: url.to_string(),
            candidates,
            sink,
            concurrency: config.concurrency,
            mode: config.mode,
            timeout: config.timeout,
            palette: Arc::new(palette),
        })
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Normalizes the target, fans the probes out, and waits for the sink.
    pub async fn execute(self) -> Result<ScanOutcome> {
        let started = Local::now();
        let client = build_client(self.timeout).wrap_err("Failed to build HTTP client")?;
        let target = normalize_target(&client, &self.url).await;

        info!(
            target = %target.base_url(),
            mode = %self.mode,
            candidates = self.candidates.len(),
            concurrency = self.concurrency,
            "Starting probe scan."
        );

        let prober = HttpProber::new(client, target.clone(), self.mode, Arc::clone(&self.palette));
        let dispatcher = Dispatcher::new(Arc::new(prober), self.concurrency);

        let (tx, rx) = mpsc::channel(channel_capacity(self.concurrency));
        let drain = tokio::spawn(self.sink.drain(rx));
        let dispatch = dispatcher.run(self.candidates, tx).await;
        let report = drain.await.wrap_err("Result sink task failed")?;

        let outcome = ScanOutcome {
            target,
            dispatch,
            summary: report.summary,
            written: report.written,
            started,
            finished: Local::now(),
        };
        info!(
            results = outcome.summary.total,
            live = outcome.summary.live(),
            elapsed_ms = outcome.elapsed().num_milliseconds(),
            "Probe scan finished."
        );
        Ok(outcome)
    }
}

// Room for every in-flight task to deliver without waiting on the sink.
fn channel_capacity(concurrency: usize) -> usize {
    concurrency.saturating_mul(2).max(64)
}

/// Human-readable closing lines for a finished scan.
pub fn render_summary(outcome: &ScanOutcome) -> String {
    let s = &outcome.summary;
    format!(
        "[*] {} results for {} in {:.1}s: {} 2xx, {} 3xx, {} 404, {} 4xx, {} 5xx, {} other, {} errors, {} timeouts",
        s.total,
        outcome.target.base_url(),
        outcome.elapsed().num_milliseconds() as f64 / 1000.0,
        s.success,
        s.redirect,
        s.not_found,
        s.client_error,
        s.server_error,
        s.other,
        s.errors,
        s.timeouts,
    )
}
