//! Strike Hours API server binary

use clap::Parser;
use std::path::PathBuf;
use strike_hours::api::{run_api_server, ApiConfig};
use strike_hours::config::Config;

#[derive(Parser, Debug)]
#[command(name = "strike-hours-server")]
#[command(version)]
#[command(about = "Strike Hours API Server - HTTP lookup of strike hours per employee")]
#[command(long_about = r#"
Strike Hours API Server

Endpoints:
  - GET /api/v1/months                      - Months found in the workbook
  - GET /api/v1/search?q=carlos             - Employee names containing q
  - GET /api/v1/report?name=NAME            - Per-month days and hours
  - GET /api/v1/report/xlsx?name=NAME       - Download Horas_<NAME>.xlsx
  - GET /health, /version, /

The workbook is read once and kept in memory; restart to pick up edits.

Example usage:
  strike-hours-server --source horas_greve.ods
  strike-hours-server --host 0.0.0.0 --port 3000
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "STRIKE_HOURS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "STRIKE_HOURS_PORT")]
    port: u16,

    /// YAML config file
    #[arg(short, long, env = "STRIKE_HOURS_CONFIG")]
    config: Option<PathBuf>,

    /// Spreadsheet to serve (default: horas_greve.ods)
    #[arg(short, long, env = "STRIKE_HOURS_SOURCE")]
    source: Option<PathBuf>,

    /// YAML mapping of extra sheet names to month labels
    #[arg(short, long, env = "STRIKE_HOURS_LABELS")]
    labels: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app = Config::resolve(args.config.as_deref(), args.source, args.labels.as_deref())?;
    let config = ApiConfig {
        host: args.host,
        port: args.port,
        app,
    };

    run_api_server(config).await
}
