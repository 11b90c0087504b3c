// src/core/scanner/mod.rs

// Public interface of the `scanner` module: the HTTP probing pipeline
// (target -> probe -> dispatcher -> sink) and the independent DNS reporter.
pub mod dispatcher;
pub mod dns_scanner;
pub mod probe;
pub mod sink;
pub mod target;

use reqwest::redirect::Policy;
use std::time::Duration;

/// User agent sent with every probe request.
pub const USER_AGENT: &str = concat!("subcheck-rs/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the HTTP client shared by the normalizer and all probe tasks.
///
/// Redirects are not followed: a `301` for a probed path is reported as a
/// `301`, not as the status of wherever it points.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
}
