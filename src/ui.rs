//! Terminal styling helpers for command output.

use crate::policy::types::Severity;
use colored::{ColoredString, Colorize};

pub fn info(msg: &str) -> String {
    format!("{} {}", "ℹ".bright_cyan().bold(), msg)
}

pub fn success(msg: &str) -> String {
    format!("{} {}", "✔".green().bold(), msg)
}

pub fn warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg)
}

pub fn error(msg: &str) -> String {
    format!("{} {}", "✖".bright_magenta().bold(), msg)
}

pub fn header(msg: &str) -> ColoredString {
    msg.bright_purple().bold()
}

/// Severity label coloured by urgency.
pub fn severity(severity: Severity) -> ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.bright_red().bold(),
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.green(),
        Severity::Info => label.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_keep_message() {
        colored::control::set_override(false);
        assert_eq!(info("hello"), "ℹ hello");
        assert_eq!(success("done"), "✔ done");
        assert_eq!(warning("careful"), "⚠ careful");
        assert_eq!(error("boom"), "✖ boom");
        assert_eq!(severity(Severity::High).to_string(), "HIGH");
    }
}
