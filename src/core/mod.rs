// src/core/mod.rs

/// Data structures shared across the scanner: probe results, status
/// families, targets and DNS reports.
pub mod models;

/// The read-only status-family color table.
pub mod palette;

/// The HTTP probing pipeline and the DNS reporter.
pub mod scanner;

/// Built-in candidate lists and the list-file loader.
pub mod wordlists;
