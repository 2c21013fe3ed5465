//! ANSI styling for status lines and error reports.
//!
//! `--color auto` styles only when both streams are terminals and NO_COLOR is
//! unset; `always` and `never` skip detection.

use std::env;
use std::io::{self, IsTerminal};

use clap::ColorChoice;

/// Whether status and error output gets ANSI styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Resolve the `--color` flag
    pub fn new(choice: ColorChoice) -> Self {
        let enabled = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Self::terminal_wants_colors(),
        };
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn terminal_wants_colors() -> bool {
        if env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            return false;
        }
        io::stderr().is_terminal() && io::stdout().is_terminal()
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    /// Gray, for hints and secondary lines
    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }
}
