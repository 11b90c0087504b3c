//! Read-only mapping from status family to terminal color.
//!
//! The table is built once at startup and shared by reference with every
//! probe task. It is never mutated after construction.

use crate::core::models::StatusFamily;
use crossterm::style::{Color, Stylize};
use std::collections::HashMap;

/// The color assigned to each status family.
static DEFAULT_COLORS: &[(StatusFamily, Color)] = &[
    (StatusFamily::Success, Color::Green),
    (StatusFamily::Redirect, Color::Blue),
    (StatusFamily::NotFound, Color::Yellow),
    (StatusFamily::ClientError, Color::Magenta),
    (StatusFamily::ServerError, Color::Red),
    (StatusFamily::Other, Color::Reset),
];

#[derive(Debug, Clone)]
pub struct StatusPalette {
    colors: HashMap<StatusFamily, Color>,
    // Color used for lines that carry no status at all.
    failure: Color,
    enabled: bool,
}

impl StatusPalette {
    pub fn ansi() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().copied().collect(),
            failure: Color::DarkGrey,
            enabled: true,
        }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Self { enabled: false, ..Self::ansi() }
    }

    pub fn color_for(&self, family: StatusFamily) -> Color {
        self.colors.get(&family).copied().unwrap_or(Color::Reset)
    }

    pub fn paint(&self, family: StatusFamily, text: &str) -> String {
        self.paint_with(self.color_for(family), text)
    }

    pub fn paint_failure(&self, text: &str) -> String {
        self.paint_with(self.failure, text)
    }

    fn paint_with(&self, color: Color, text: &str) -> String {
        if !self.enabled || color == Color::Reset {
            return text.to_string();
        }
        text.with(color).to_string()
    }
}
