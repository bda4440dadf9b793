//! Centralized UI formatting and color utilities
//!
//! This module provides a unified interface for severity colors, icons, and
//! formatting patterns used throughout the reqmark CLI.

use colored::{ColoredString, Colorize};

use crate::lint::Severity;

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var("REQMARK_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns a colored icon for a lint severity.
///
/// Icons:
/// - Error: ✗ (red)
/// - Warning: ⚠ (yellow)
pub fn severity_icon(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "✗".red(),
        Severity::Warning => "⚠".yellow(),
    }
}

/// Icon for a requirement selected by its marker (or carrying none).
pub fn included_icon() -> ColoredString {
    "●".green()
}

/// Icon for a requirement excluded by its marker.
pub fn excluded_icon() -> ColoredString {
    "○".dimmed()
}

/// Color scheme for status-related text output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Green for success/completion
    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    /// Yellow for warnings
    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    /// Red for errors
    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    /// Cyan for identifiers (package names, file paths)
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Dimmed for secondary text
    pub fn secondary(text: &str) -> ColoredString {
        text.dimmed()
    }

    /// Bold for headings
    pub fn heading(text: &str) -> ColoredString {
        text.bold()
    }
}

/// Common text formatting patterns
pub mod format {
    /// Format a separator line for sections
    pub fn separator(width: usize) -> String {
        "─".repeat(width)
    }

    /// Pad a cell to a column width (names and versions stay ASCII, so
    /// byte length is fine here).
    pub fn pad(text: &str, width: usize) -> String {
        format!("{:<width$}", text, width = width)
    }
}
