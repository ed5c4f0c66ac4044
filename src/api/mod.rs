//! csvsheet API Server module
//!
//! HTTP upload API: preview a CSV upload as JSON or download it as .xlsx.
//! Run with `csvsheet-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig};
