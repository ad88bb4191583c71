use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strike_hours::cli::{self, OutputFormat};
use strike_hours::config::Config;
use strike_hours::error::StrikeResult;
use strike_hours::report::HoursDisplay;
use strike_hours::search::EmptyQuery;

#[derive(Parser)]
#[command(name = "strike-hours")]
#[command(about = "Proof of strike hours: look up an employee across the monthly sheets.")]
#[command(long_about = "Strike Hours - proof-of-hours lookup over a strike spreadsheet

Reads a workbook with one sheet per month (ods, xlsx, xls), finds each
sheet's header row, and totals one employee's strike days and hours.

COMMANDS:
  months  - List the months found in the workbook
  search  - Find employee names containing a query
  report  - Per-month days and hours for one employee, with total
  dump    - Show the normalized tables as YAML

EXAMPLES:
  strike-hours search carlos
  strike-hours report \"CARLOS EDUARDO\" --display literal
  strike-hours report \"CARLOS EDUARDO\" -o Horas_CARLOS.xlsx
  strike-hours --source dados/horas.xlsx months")]
#[command(version)]
struct Cli {
    /// YAML config file (source, labels, column aliases, defaults)
    #[arg(short, long, global = true, env = "STRIKE_HOURS_CONFIG")]
    config: Option<PathBuf>,

    /// Spreadsheet to read (default: horas_greve.ods)
    #[arg(short, long, global = true, env = "STRIKE_HOURS_SOURCE")]
    source: Option<PathBuf>,

    /// YAML mapping of extra sheet names to month labels
    #[arg(short, long, global = true, env = "STRIKE_HOURS_LABELS")]
    labels: Option<PathBuf>,

    /// Log per-sheet header detection to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the months found in the workbook
    Months,

    /// Find employee names containing a query (case-insensitive)
    Search {
        /// Text to look for in names
        #[arg(default_value = "")]
        query: String,

        /// Return every name when the query is empty
        #[arg(long)]
        all_on_empty: bool,
    },

    #[command(long_about = "Aggregate one employee across all months.

The name must match exactly (case and surrounding spaces ignored); use
'search' to find the spelling used in the sheets.

DISPLAY:
  numeric - hours parsed and shown with two decimals (default)
  literal - hours shown as typed; total as e.g. 18h30min

OUTPUT:
  --output writes the proof artifact; the format follows the extension
  (.xlsx, .yaml, .json). Nothing is written when no row matches.")]
    /// Per-month days and hours for one employee, with total
    Report {
        /// Employee name
        name: String,

        /// How hours are shown
        #[arg(short, long, value_enum)]
        display: Option<HoursDisplay>,

        /// Write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the normalized tables as YAML
    Dump {
        /// Only this month label (e.g. NOV/2025)
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn main() -> StrikeResult<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let config = Config::resolve(cli.config.as_deref(), cli.source, cli.labels.as_deref())?;

    match cli.command {
        Commands::Months => cli::months(&config),

        Commands::Search {
            query,
            all_on_empty,
        } => {
            let empty = if all_on_empty {
                EmptyQuery::MatchAll
            } else {
                config.empty_query
            };
            cli::search(&config, &query, empty).map(|_| ())
        }

        Commands::Report {
            name,
            display,
            output,
            format,
        } => {
            let display = display.unwrap_or(config.display);
            cli::report(&config, &name, display, output, format).map(|_| ())
        }

        Commands::Dump { month } => cli::dump(&config, month),
    }
}
