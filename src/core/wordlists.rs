//! Static, read-only candidate lists and the loader for user-supplied lists.
//!
//! The built-in lists are used whenever no `-l` file is given. User lists are
//! plain text, one candidate per line.

use crate::core::models::ProbeMode;
use color_eyre::eyre::{Result, WrapErr};
use std::path::Path;
use tracing::{debug, info};

/// Default subdomain labels tried against the target domain.
pub static DEFAULT_SUBDOMAINS: &[&str] = &[
    "www", "api", "mail", "blog", "dev", "test", "shop", "ftp", "support",
    "admin", "m", "dashboard", "static", "cms", "staging", "cdn", "secure", "beta",
    "docs", "help", "assets", "media", "portal", "gateway", "office", "download",
    "mobile", "search", "cloud", "services", "pay", "webmail", "smtp", "vpn", "app",
    "auth", "login", "logout", "register", "upload", "images", "backup", "status",
    "chat", "my", "devops", "partners", "analytics", "monitoring", "graph", "reporting",
    "proxy", "archive", "cache", "test1", "test2", "api-v1", "api-v2", "resources",
];

/// Default paths tried in directory mode. Mostly files that leak information
/// when left exposed.
pub static DEFAULT_DIRECTORIES: &[&str] = &[
    "admin", "login", "dashboard", "api", "backup", "uploads", "config", "static",
    ".env", ".git/HEAD", ".DS_Store", "robots.txt", "sitemap.xml", "server-status",
    "phpinfo.php", "wp-login.php", "wp-admin", "version", "status", "health",
];

/// Returns the built-in list for a probe mode as owned candidates.
pub fn default_candidates(mode: ProbeMode) -> Vec<String> {
    let list = match mode {
        ProbeMode::Subdomain => DEFAULT_SUBDOMAINS,
        ProbeMode::Directory => DEFAULT_DIRECTORIES,
    };
    list.iter().map(|s| s.to_string()).collect()
}

/// Splits raw list content into candidates: each line trimmed, blank lines
/// dropped, order kept.
pub fn parse_candidates(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Reads a newline-delimited candidate file.
pub async fn load_candidates(path: &Path) -> Result<Vec<String>> {
    debug!(path = %path.display(), "Reading candidate list.");
    let content = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Error reading candidate list {}", path.display()))?;
    let candidates = parse_candidates(&content);
    info!(path = %path.display(), count = candidates.len(), "Candidate list loaded.");
    Ok(candidates)
}
