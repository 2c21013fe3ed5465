//! Error message formatting with actionable suggestions.
//!
//! Provides user-friendly error formatting that includes context,
//! suggestions for fixes, and configuration file locations when available.

use clap::ColorChoice;
use webflow_core::error::WebflowError;
use super::colors::ColorSupport;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create an error formatter styled per the `--color` flag
    pub fn new(color: ColorChoice) -> Self {
        Self::with_colors(ColorSupport::new(color))
    }

    /// Create an error formatter with explicit color support
    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &WebflowError) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let WebflowError::TomlParse { line, column, .. } = error {
            if *line > 0 {
                output.push_str(&self.format_location("webflow.toml", *line, *column));
                output.push('\n');
            }
        }

        // Every failed unit of a parallel batch
        if let WebflowError::Batch { failures } = error {
            for (index, failure) in failures {
                output.push_str(&format!("  {} {}: {}\n", self.colors.dim("-"), index, failure));
            }
        }

        if let Some(chunk) = error.chunk() {
            output.push_str(&format!(
                "{} chunk #{} did not complete; other chunks may already have been applied\n",
                self.colors.dim("note:"),
                chunk
            ));
        }

        // Add suggestion if available
        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        // Add source chain if available
        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format file location context
    pub fn format_location(&self, file: &str, line: usize, column: usize) -> String {
        format!(
            "{} {}:{}:{}",
            self.colors.dim("-->"),
            file,
            line,
            column
        )
    }
}
