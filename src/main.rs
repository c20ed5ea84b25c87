use clap::{Args, Parser, Subcommand};
use rx_tidy::cli;
use rx_tidy::core::DEFAULT_PREVIEW_ROWS;
use rx_tidy::error::TidyResult;
use rx_tidy::excel::{LoadOptions, DEFAULT_LABEL_COLUMN};
use rx_tidy::pipeline::PipelineOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rx-tidy")]
#[command(about = "Reshape wide monthly dispensing spreadsheets into tidy CSV")]
#[command(long_about = "rx-tidy - wide → tidy reshape for dispensing extracts

INPUT LAYOUT:
  First column 'DRUG_NAME' holds row labels. Every other column header is a
  spreadsheet serial date (e.g. 44012 = 2020-06-30); cells are counts.

OUTPUT:
  One row per (label, month) cell: Label,PeriodEnd,Value
  PeriodEnd is always the last day of the header's month.

COMMANDS:
  import  - Reshape and print a preview + summary
  export  - Reshape and write CSV

EXAMPLES:
  rx-tidy import dispensing.xlsx
  rx-tidy import dispensing.xlsx --json
  rx-tidy export dispensing.xlsx tidy.csv --sheet Monthly")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Worksheet to read (defaults to the first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Header of the label column
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl SourceArgs {
    fn options(&self, preview_rows: usize) -> PipelineOptions {
        PipelineOptions {
            load: LoadOptions {
                label_column: self.label_column.clone(),
                sheet: self.sheet.clone(),
            },
            preview_rows,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape a workbook and print a preview and summary
    Import {
        /// Path to the workbook (.xlsx, .xls, .ods, ...)
        input: PathBuf,

        /// Number of records to preview (0 disables the preview)
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview: usize,

        /// Print the summary as JSON instead of the report
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Reshape a workbook and write Label,PeriodEnd,Value CSV
    Export {
        /// Path to the workbook (.xlsx, .xls, .ods, ...)
        input: PathBuf,

        /// Output CSV file path
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Filter used when `RUST_LOG` is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "rx_tidy=debug"
    } else {
        "rx_tidy=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> TidyResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            preview,
            json,
            source,
        } => {
            init_tracing(source.verbose);
            cli::import(input, source.options(preview), json, source.verbose)
        }

        Commands::Export {
            input,
            output,
            source,
        } => {
            init_tracing(source.verbose);
            cli::export(input, output, source.options(0), source.verbose)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "rx_tidy=info");
        assert_eq!(default_filter(true), "rx_tidy=debug");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
