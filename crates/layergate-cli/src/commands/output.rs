//! Shared output formatting for validation results.

use anyhow::Result;
use layergate_core::{RuleStatus, Severity, ValidationResults};

use crate::OutputFormat;

/// Print validation results in the specified format.
pub fn print(results: &ValidationResults, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(results),
        OutputFormat::Json => return print_json(results),
        OutputFormat::Compact => print_compact(results),
    }
    Ok(())
}

fn print_text(results: &ValidationResults) {
    let (errors, warnings, infos) = results.count_by_severity();

    for rule in &results.rules {
        let status_indicator = match rule.status {
            RuleStatus::Passed => "\x1b[32mpassed\x1b[0m",
            RuleStatus::Failed => "\x1b[31mfailed\x1b[0m",
            RuleStatus::Skipped => "\x1b[90mskipped\x1b[0m",
        };
        println!(
            "{} {} ({} file(s))",
            status_indicator, rule.name, rule.files_checked
        );
        if let Some(message) = &rule.message {
            println!("  {message}");
        }

        for violation in &rule.violations {
            let severity_indicator = match violation.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };
            println!("  {}", violation.location());
            println!("    {}: {}", severity_indicator, violation.message);
            if let Some(related) = &violation.related_file {
                println!("    = import: {related}");
            }
            if let Some(suggestion) = &violation.suggestion {
                println!("    = help: {suggestion}");
            }
        }
    }
    println!();

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let summary = results.summary;
    println!(
        "{}{} rule(s): {} passed, {} failed. Found {} error(s), {} warning(s), {} info(s)\x1b[0m",
        summary_color, summary.total, summary.passed, summary.failed, errors, warnings, infos
    );
}

fn print_json(results: &ValidationResults) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{json}");
    Ok(())
}

fn print_compact(results: &ValidationResults) {
    for violation in results.violations() {
        println!("{violation}");
    }
}
