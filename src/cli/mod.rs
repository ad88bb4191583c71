//! CLI command handlers

pub mod commands;

pub use commands::{dump, load_data, months, report, search, OutputFormat};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber; `RUST_LOG` wins over `verbose`
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "strike_hours=debug"
    } else {
        "strike_hours=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests driving several commands) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
