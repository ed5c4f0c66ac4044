use clap::{Parser, Subcommand};
use colored::Colorize;
use csvsheet::cli;
use csvsheet::excel::DEFAULT_SHEET_NAME;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "csvsheet")]
#[command(about = "Convert CSV files to styled Excel workbooks.")]
#[command(long_about = "csvsheet - CSV to Excel (.xlsx) converter

Detects the separator (comma, or semicolon as fallback), infers a type for
every column (integer, float, text) and writes a single-sheet workbook with a
bold, shaded, bordered header row and columns sized to their content.

COMMANDS:
  convert   - CSV to Excel (.xlsx)
  preview   - Show the parsed table without converting
  inspect   - Show the contents of a converted workbook

EXAMPLES:
  csvsheet convert report.csv                  # Writes report.xlsx
  csvsheet convert data.csv -o out.xlsx -v
  csvsheet preview data.csv -n 50
  csvsheet inspect report.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert a CSV file to an Excel .xlsx workbook.

The separator is detected automatically: comma first, then semicolon.
Every row must have the same number of fields as the header.

OUTPUT:
  Defaults to the input name with .csv replaced by .xlsx (or .xlsx
  appended), in the same directory as the input.

EXAMPLE:
  csvsheet convert quarterly.csv
  csvsheet convert quarterly.csv --output ~/Desktop/q.xlsx --sheet-name Q1")]
    /// Convert a CSV file to Excel .xlsx
    Convert {
        /// Path to the CSV file
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet name
        #[arg(long, default_value = DEFAULT_SHEET_NAME, env = "CSVSHEET_SHEET_NAME")]
        sheet_name: String,

        /// Show column types and widths
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the parsed CSV table without converting
    Preview {
        /// Path to the CSV file
        input: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = cli::DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },

    /// Show the contents of an Excel .xlsx workbook
    Inspect {
        /// Path to the Excel file
        input: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = cli::DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            sheet_name,
            verbose,
        } => cli::convert(input, output, sheet_name, verbose),

        Commands::Preview { input, rows } => cli::preview(input, rows),

        Commands::Inspect { input, rows } => cli::inspect(input, rows),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.status_message().red().bold());
            eprintln!("   {}", e);
            ExitCode::FAILURE
        }
    }
}
