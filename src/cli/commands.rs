use crate::core::{format_preview, Summary, LABEL_DELIMITER};
use crate::error::{TidyError, TidyResult};
use crate::pipeline::{self, PipelineOptions};
use crate::writer::CsvExporter;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the import command: reshape and show a preview plus summary
pub fn import(
    input: PathBuf,
    options: PipelineOptions,
    json: bool,
    verbose: bool,
) -> TidyResult<()> {
    if json {
        let (_, summary) = pipeline::run(&input, &options)?;
        println!("{}", summary_json(&summary)?);
        return Ok(());
    }

    println!("{}", "💊 rx-tidy - Import".bold().green());
    println!("   Input: {}", input.display());
    if let Some(ref sheet) = options.load.sheet {
        println!("   Sheet: {}", sheet.bright_yellow());
    }
    println!();

    if verbose {
        println!("{}", "📖 Reading workbook and reshaping...".cyan());
    }

    let (table, summary) = pipeline::run(&input, &options)?;

    if options.preview_rows > 0 {
        println!("{}", "📋 Preview:".bold().cyan());
        for line in format_preview(table.preview(options.preview_rows)).lines() {
            println!("   {}", line);
        }
        println!();
    }

    print_summary(&summary);
    Ok(())
}

/// Execute the export command: reshape and write CSV
pub fn export(
    input: PathBuf,
    output: PathBuf,
    options: PipelineOptions,
    verbose: bool,
) -> TidyResult<()> {
    println!("{}", "💊 rx-tidy - CSV Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading workbook and reshaping...".cyan());
    }

    let (table, summary) = pipeline::run(&input, &options)?;

    if verbose {
        println!("   {} records\n", table.len());
        println!("{}", "💾 Writing CSV file...".cyan());
    }

    CsvExporter::new(&output).write(&table)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   CSV file: {}\n", output.display());
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("{}", "📊 Summary:".bold().cyan());
    println!("   Labels:  {}", labels_line(summary).bright_blue());
    match summary.period_range() {
        Some((first, last)) => println!("   Periods: {} to {}", first, last),
        None => println!("   Periods: {}", "none".yellow()),
    }
    println!("   Records: {}", summary.records.to_string().bold());
}

/// Distinct labels as shown in the summary report
fn labels_line(summary: &Summary) -> String {
    summary.labels_joined(LABEL_DELIMITER)
}

fn summary_json(summary: &Summary) -> TidyResult<String> {
    serde_json::to_string_pretty(summary).map_err(|e| TidyError::write("<stdout>", e.into()))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
