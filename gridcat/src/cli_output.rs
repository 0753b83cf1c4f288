// ABOUTME: Centralized stderr output for user-facing errors, warnings and hints
// ABOUTME: Colors prefixes with owo-colors only when stderr is a terminal

use gridcat_core::GridError;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Formats diagnostics for stderr. Stdout is reserved for the image grid.
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal(),
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_error(message));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.format_warning(message));
    }

    pub fn hint(&self, message: &str) {
        eprintln!("{}", self.format_hint(message));
    }

    /// Report a failed run, with a hint when the error carries one
    pub fn report(&self, error: &anyhow::Error) {
        match error.downcast_ref::<GridError>() {
            Some(grid_error) => {
                self.error(&grid_error.to_string());
                if let Some(help) = grid_error.help_text() {
                    self.hint(help);
                }
            }
            None => self.error(&format!("{:#}", error)),
        }
    }

    /// Warn about an image left out of the grid
    pub fn skipped(&self, error: &GridError) {
        self.warning(&format!("skipping image: {}", error));
    }

    fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }

    fn format_warning(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "warning:".yellow().bold(), message)
        } else {
            format!("warning: {}", message)
        }
    }

    fn format_hint(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "hint:".blue().bold(), message)
        } else {
            format!("hint: {}", message)
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
