//! Output formatting

use console::{style, Term};

/// Line-oriented reporter writing to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().force_styling(true).to_string()
        } else {
            "OK".to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().force_styling(true).to_string()
        } else {
            "FAIL".to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().force_styling(true).to_string()
        } else {
            format!("== {title} ==")
        };
        self.line(&styled);
    }

    /// Print a plain line; result output ignores quiet mode
    pub fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// Dim `text` when colors are on
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            style(text).dim().force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_without_color_is_plain() {
        let reporter = Reporter::new(false, false);
        assert_eq!(reporter.dim("web, ios"), "web, ios");
    }

    #[test]
    fn test_dim_with_color_adds_escapes() {
        let reporter = Reporter::new(true, false);
        let dimmed = reporter.dim("web");
        assert!(dimmed.contains("web"));
        assert_ne!(dimmed, "web");
    }

    #[test]
    fn test_default_is_plain_and_loud() {
        let reporter = Reporter::default();
        assert!(!reporter.use_color);
        assert!(!reporter.quiet);
    }
}
