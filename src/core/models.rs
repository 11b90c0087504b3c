// src/core/models.rs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// --- Reusable Result Types ---

// A Result that can hold an optional success value or a String error.
// `Ok(None)` means the operation succeeded but produced nothing.
pub type ScanResult<T> = Result<Option<T>, String>;

// --- Probe Models ---

/// Selects how a candidate is turned into a child URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum ProbeMode {
    /// `<scheme>://<candidate>.<host>`
    Subdomain,
    /// `<base>/<candidate>`
    Directory,
}

/// The hundreds-digit grouping of an HTTP status, with 404 split out so it
/// can be highlighted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum StatusFamily {
    #[strum(serialize = "2xx")]
    Success,
    #[strum(serialize = "3xx")]
    Redirect,
    #[strum(serialize = "404")]
    NotFound,
    #[strum(serialize = "4xx")]
    ClientError,
    #[strum(serialize = "5xx")]
    ServerError,
    #[strum(serialize = "other")]
    Other,
}

impl StatusFamily {
    pub fn classify(status: u16) -> Self {
        match status {
            200..=299 => StatusFamily::Success,
            300..=399 => StatusFamily::Redirect,
            404 => StatusFamily::NotFound,
            400..=499 => StatusFamily::ClientError,
            500..=599 => StatusFamily::ServerError,
            _ => StatusFamily::Other,
        }
    }
}

/// What happened when a single probe request was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    Status(u16),
    Error(String),
    Timeout,
}

impl ProbeOutcome {
    /// The status family, or `None` when no response was received.
    pub fn family(&self) -> Option<StatusFamily> {
        match self {
            ProbeOutcome::Status(code) => Some(StatusFamily::classify(*code)),
            ProbeOutcome::Error(_) | ProbeOutcome::Timeout => None,
        }
    }
}

/// The result of probing one candidate. Produced by a probe task and moved
/// through the result channel to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub candidate: String,
    pub outcome: ProbeOutcome,
    /// Display line, possibly carrying ANSI color codes.
    pub line: String,
}

// Tallies of one scan, filled in by the sink as results arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub success: usize,
    pub redirect: usize,
    pub not_found: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub other: usize,
    pub errors: usize,
    pub timeouts: usize,
}

impl ScanSummary {
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        self.total += 1;
        match (outcome.family(), outcome) {
            (Some(StatusFamily::Success), _) => self.success += 1,
            (Some(StatusFamily::Redirect), _) => self.redirect += 1,
            (Some(StatusFamily::NotFound), _) => self.not_found += 1,
            (Some(StatusFamily::ClientError), _) => self.client_error += 1,
            (Some(StatusFamily::ServerError), _) => self.server_error += 1,
            (Some(StatusFamily::Other), _) => self.other += 1,
            (None, ProbeOutcome::Timeout) => self.timeouts += 1,
            (None, _) => self.errors += 1,
        }
    }

    /// Candidates that answered with something other than 404.
    pub fn live(&self) -> usize {
        self.success + self.redirect + self.client_error + self.server_error + self.other
    }
}

/// A normalized scan target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// `https` or `http`.
    pub scheme: String,
    /// Bare host, optionally with a port. Never carries a scheme or a path.
    pub host: String,
}

impl Target {
    pub fn new(scheme: &str, host: &str) -> Self {
        Self { scheme: scheme.to_string(), host: host.to_string() }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

// --- DNS Reporter Models ---

/// The record kinds queried by the DNS reporter, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum DnsRecordKind {
    #[strum(serialize = "A")]
    Address,
    #[strum(serialize = "CNAME")]
    CanonicalName,
    #[strum(serialize = "MX")]
    MailExchanger,
    #[strum(serialize = "NS")]
    NameServer,
    #[strum(serialize = "TXT")]
    Text,
}

// One section of a DNS report: a record kind and the outcome of its lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsSection {
    pub kind: DnsRecordKind,
    pub records: ScanResult<Vec<String>>,
}

// A full DNS report for one domain. Sections appear in lookup order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsReport {
    pub domain: String,
    pub sections: Vec<DnsSection>,
}

impl DnsReport {
    pub fn section(&self, kind: DnsRecordKind) -> Option<&DnsSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}
