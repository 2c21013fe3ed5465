//! Terminal output formatting and utilities.
//!
//! Command results go to stdout as pretty-printed JSON so they can be piped;
//! status lines go to stderr.

pub mod colors;
pub mod errors;

use clap::ColorChoice;
use serde_json::Value;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create an output handler styled per the `--color` flag
    pub fn new(color: ColorChoice) -> Self {
        Self {
            colors: colors::ColorSupport::new(color),
        }
    }

    /// Print a command result
    pub fn json(&self, value: &Value) {
        println!("{:#}", value);
    }

    /// Print text to stdout unchanged
    pub fn plain(&self, text: &str) {
        println!("{}", text.trim_end());
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a step message with emoji
    pub fn step(&self, emoji: &str, message: &str) {
        eprintln!("{} {}", emoji, self.colors.bold(message));
    }
}
