// src/cli.rs

use crate::app::ScanConfig;
use crate::core::models::ProbeMode;
use crate::core::scanner::DEFAULT_TIMEOUT;
use crate::core::scanner::dispatcher::DEFAULT_CONCURRENCY;
use crate::core::scanner::sink::Destination;
use crate::core::scanner::target::strip_scheme;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target host to probe, with or without a scheme
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Newline-delimited candidate list; a built-in list is used when absent
    #[arg(short = 'l', long = "list")]
    pub list: Option<PathBuf>,

    /// Print a DNS record report for this domain
    #[arg(short = 'd', long = "domain")]
    pub domain: Option<String>,

    /// Write result lines to this file instead of standard output
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Maximum number of probes in flight
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_CONCURRENCY)]
    pub threads: usize,

    /// How candidates are combined with the target
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = ProbeMode::Subdomain)]
    pub mode: ProbeMode,

    /// Per-probe timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Disable ANSI colors in result lines
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Mirror log output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether there is anything to do at all.
    pub fn has_work(&self) -> bool {
        self.url.is_some() || self.domain.is_some()
    }

    /// Checks flag values and turns them into a scan configuration.
    pub fn into_config(self) -> Result<ScanConfig> {
        if self.threads == 0 {
            return Err(eyre!("Thread count must be at least 1."));
        }
        if self.timeout == 0 {
            return Err(eyre!("Timeout must be at least 1 second."));
        }
        let url = match self.url {
            Some(url) if url.trim().is_empty() => {
                return Err(eyre!("Please provide a URL. Usage: -u https://example.com"));
            }
            Some(url) => {
                validate_host(&url)?;
                Some(url)
            }
            None => None,
        };
        let destination = match self.output {
            Some(path) => Destination::File(path),
            None => Destination::Stdout,
        };

        Ok(ScanConfig {
            url,
            list: self.list,
            domain: self.domain.filter(|d| !d.trim().is_empty()),
            destination,
            concurrency: self.threads,
            mode: self.mode,
            timeout: Duration::from_secs(self.timeout),
            color: !self.no_color,
        })
    }
}

/// Rejects input whose host part cannot form a URL.
fn validate_host(input: &str) -> Result<()> {
    let host = strip_scheme(input);
    match Url::parse(&format!("http://{}", host)) {
        Ok(url) if url.host_str().is_some() => Ok(()),
        _ => Err(eyre!("Invalid target URL: {}", input)),
    }
}
