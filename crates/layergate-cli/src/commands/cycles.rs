//! Cycles command implementation.

use anyhow::Result;
use std::path::Path;

use crate::OutputFormat;

/// Runs the cycles command.
pub fn run(components: &Path, format: OutputFormat) -> Result<()> {
    let graph = super::load_graph(components)?;
    let cycles = graph.find_cycles();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cycles)?),
        OutputFormat::Text | OutputFormat::Compact => print_text(&cycles),
    }

    if !cycles.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_text(cycles: &[Vec<String>]) {
    for cycle in cycles {
        println!("{}", cycle.join(" -> "));
    }

    if cycles.is_empty() {
        println!("\x1b[32mNo dependency cycles found\x1b[0m");
    } else {
        println!("\x1b[31mFound {} dependency cycle(s)\x1b[0m", cycles.len());
    }
}
