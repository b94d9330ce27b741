//! Presentation layer
//!
//! This module handles:
//! - Printing dispatch results (pretty JSON or text) to stdout
//! - Printing errors and warnings with their help line to stderr
//! - The volume views and the help screen (via submodules)
//!
//! Formatting and printing are split so the formatted text can be tested
//! without a terminal.

use console::Style;
use miette::Diagnostic;

use crate::dispatcher::DisplayResult;
use crate::error::PxDiagError;

pub mod help;
pub mod volume;

/// Text to print for a result, `None` when there is nothing to show
pub fn format_result(result: &DisplayResult) -> Option<String> {
    match result {
        DisplayResult::Json(value) => {
            Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        }
        DisplayResult::Text(text) => Some(text.trim_end_matches('\n').to_string()),
        DisplayResult::Empty => None,
    }
}

pub fn print_result(result: &DisplayResult) {
    if let Some(text) = format_result(result) {
        println!("{}", text);
    }
}

fn format_diagnostic(label: &str, style: &Style, err: &PxDiagError) -> String {
    let mut text = format!("{} {}", style.apply_to(label), err);
    if let Some(help) = err.help() {
        text.push_str(&format!("\n  {} {}", Style::new().for_stderr().dim().apply_to("help:"), help));
    }
    text
}

/// `Error: <message>` followed by the help line, if any
pub fn format_error(err: &PxDiagError) -> String {
    format_diagnostic("Error:", &Style::new().for_stderr().red().bold(), err)
}

pub fn format_warning(err: &PxDiagError) -> String {
    format_diagnostic("Warning:", &Style::new().for_stderr().yellow().bold(), err)
}

pub fn print_error(err: &PxDiagError) {
    eprintln!("{}", format_error(err));
}

pub fn print_warning(err: &PxDiagError) {
    eprintln!("{}", format_warning(err));
}

/// Note flags the command does not take
pub fn print_ignored_flags(flags: &[String]) {
    if flags.is_empty() {
        return;
    }
    eprintln!(
        "{} ignoring unsupported flag(s): {}",
        Style::new().for_stderr().yellow().bold().apply_to("Warning:"),
        flags.join(" ")
    );
}
