//! Subdomain and directory probing over HTTP(S), with an optional DNS
//! record report.

pub mod app;
pub mod cli;
pub mod core;
pub mod logging;
