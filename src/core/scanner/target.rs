// src/core/scanner/target.rs

use crate::core::models::Target;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static RE_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*https?://").unwrap());

/// Reduces user input to a bare `host[:port]`.
///
/// Any leading `http://` or `https://` is removed, as is everything from the
/// first `/`, `?` or `#` onwards.
pub fn strip_scheme(input: &str) -> String {
    let without_scheme = RE_SCHEME.replace(input.trim(), "");
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Picks the scheme to use for a target.
///
/// A GET against `https://<host>` that answers below 400 selects HTTPS.
/// Anything else, including a connection failure, falls back to plain HTTP
/// without checking that HTTP actually works.
pub async fn normalize_target(client: &reqwest::Client, input: &str) -> Target {
    let host = strip_scheme(input);
    let https_url = format!("https://{}", host);
    debug!(url = %https_url, "Checking HTTPS reachability.");

    let https_ok = match client.get(&https_url).send().await {
        Ok(response) => {
            debug!(status = %response.status(), "HTTPS probe answered.");
            response.status().as_u16() < 400
        }
        Err(e) => {
            debug!(error = %e, "HTTPS probe failed.");
            false
        }
    };

    let target = if https_ok {
        Target::new("https", &host)
    } else {
        Target::new("http", &host)
    };
    info!(host = %target.host, scheme = %target.scheme, "Selected {} for {}.", target.scheme.to_uppercase(), target.host);
    target
}
