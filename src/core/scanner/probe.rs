// src/core/scanner/probe.rs

use crate::core::models::{ProbeMode, ProbeOutcome, ProbeResult, StatusFamily, Target};
use crate::core::palette::StatusPalette;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Anything that can turn one candidate into one result.
///
/// The dispatcher is generic over this so the fan-out logic does not care
/// whether results come from the network.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, candidate: &str) -> ProbeResult;
}

/// Issues a single GET per candidate against a normalized target.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    target: Target,
    mode: ProbeMode,
    palette: Arc<StatusPalette>,
}

impl HttpProber {
    /// `client` must already carry the per-request timeout.
    pub fn new(client: reqwest::Client, target: Target, mode: ProbeMode, palette: Arc<StatusPalette>) -> Self {
        Self { client, target, mode, palette }
    }

    /// Builds the child URL for a candidate.
    pub fn child_url(&self, candidate: &str) -> String {
        match self.mode {
            ProbeMode::Subdomain => format!(
                "{}://{}.{}",
                self.target.scheme,
                candidate.trim_matches('.'),
                self.target.host
            ),
            ProbeMode::Directory => format!(
                "{}/{}",
                self.target.base_url().trim_end_matches('/'),
                candidate.trim_start_matches('/')
            ),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, candidate: &str) -> ProbeResult {
        let url = self.child_url(candidate);
        let outcome = match self.client.get(&url).send().await {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(e) if e.is_timeout() => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::Error(e.to_string()),
        };
        debug!(url = %url, outcome = ?outcome, "Probe finished.");
        let line = format_line(self.mode, &url, &outcome, &self.palette);
        ProbeResult { url, candidate: candidate.to_string(), outcome, line }
    }
}

/// Renders the display line for a probe outcome.
pub fn format_line(mode: ProbeMode, url: &str, outcome: &ProbeOutcome, palette: &StatusPalette) -> String {
    match (mode, outcome) {
        (ProbeMode::Subdomain, ProbeOutcome::Error(_) | ProbeOutcome::Timeout) => {
            palette.paint_failure(&format!("{}: Not Found", url))
        }
        (ProbeMode::Directory, ProbeOutcome::Error(e)) => {
            palette.paint_failure(&format!("Error accessing {}: {}", url, e))
        }
        (ProbeMode::Directory, ProbeOutcome::Timeout) => {
            palette.paint_failure(&format!("Error accessing {}: request timed out", url))
        }
        (ProbeMode::Subdomain, ProbeOutcome::Status(404)) => {
            palette.paint(StatusFamily::NotFound, &format!("{}: Not Found (404)", url))
        }
        (_, ProbeOutcome::Status(code)) => {
            palette.paint(StatusFamily::classify(*code), &format!("{}: {}", url, code))
        }
    }
}
