//! csvsheet API Server binary
//!
//! HTTP upload API for CSV to Excel conversion.

use clap::Parser;
use csvsheet::api::{run_api_server, ApiConfig};
use csvsheet::api::server::DEFAULT_MAX_UPLOAD_BYTES;
use csvsheet::excel::DEFAULT_SHEET_NAME;

#[derive(Parser, Debug)]
#[command(name = "csvsheet-server")]
#[command(version)]
#[command(about = "csvsheet API Server - upload CSV, download styled Excel")]
#[command(long_about = r#"
csvsheet API Server - HTTP upload API

Endpoints:
  - POST /api/v1/preview?filename=NAME  - Parse the request body, return the typed table as JSON
  - POST /api/v1/convert?filename=NAME  - Return the request body converted to .xlsx

Additional endpoints:
  - GET  /health                        - Health check
  - GET  /version                       - Server version info
  - GET  /                              - API documentation

Features:
  - Comma/semicolon separator detection and column type inference
  - Styled header row and content-sized columns
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM

Example usage:
  csvsheet-server                           # Start on localhost:8080
  csvsheet-server --host 0.0.0.0 --port 3000

  curl -X POST 'http://localhost:8080/api/v1/convert?filename=report.csv' \
    --data-binary @report.csv -o report.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "CSVSHEET_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "CSVSHEET_PORT")]
    port: u16,

    /// Largest accepted upload, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "CSVSHEET_MAX_UPLOAD")]
    max_upload_bytes: usize,

    /// Worksheet name used in converted workbooks
    #[arg(long, default_value = DEFAULT_SHEET_NAME, env = "CSVSHEET_SHEET_NAME")]
    sheet_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: args.max_upload_bytes,
        sheet_name: args.sheet_name,
    };

    run_api_server(config).await
}
