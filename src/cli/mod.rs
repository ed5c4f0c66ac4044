//! CLI command handlers

pub mod commands;

pub use commands::{convert, inspect, preview, render_table, DEFAULT_PREVIEW_ROWS};
