//! HTTP API over the month data
//!
//! Run with `strike-hours-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
