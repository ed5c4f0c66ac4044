//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::ConvertError;
use crate::excel::column_widths;
use crate::types::{CellValue, Column, Delimiter};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "csvsheet API Server".to_string(),
        version: state.version.clone(),
        description: "Upload CSV, preview it, download it as Excel".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/v1/preview",
                "POST",
                "Parse an uploaded CSV body and return the typed table",
            ),
            EndpointInfo::new(
                "/api/v1/convert",
                "POST",
                "Convert an uploaded CSV body to an .xlsx download",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub sheet_name: String,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        sheet_name: state.converter.encoder().sheet_name().to_string(),
    }))
}

/// Query parameters for uploads
#[derive(Deserialize, Debug)]
pub struct UploadParams {
    /// Original name of the uploaded file; only used to name the download
    #[serde(default = "default_upload_name")]
    pub filename: String,
}

fn default_upload_name() -> String {
    "upload.csv".to_string()
}

/// Preview response
#[derive(Serialize)]
pub struct PreviewResponse {
    pub filename: String,
    pub output_filename: String,
    pub delimiter: Delimiter,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<Column>,
    pub column_widths: Vec<usize>,
    pub rows: Vec<Vec<CellValue>>,
}

/// POST /api/v1/preview - Parse and encode an upload, return the table as JSON
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    info!(filename = %params.filename, bytes = body.len(), "preview request");

    match state.converter.convert(&body, &params.filename) {
        Ok(conversion) => {
            let table = conversion.table;
            Json(ApiResponse::ok(PreviewResponse {
                filename: params.filename,
                output_filename: conversion.document.filename,
                delimiter: conversion.delimiter,
                row_count: table.row_count(),
                column_count: table.column_count(),
                column_widths: column_widths(&table),
                columns: table.columns,
                rows: table.rows,
            }))
            .into_response()
        }
        Err(e) => error_response(&params.filename, e),
    }
}

/// POST /api/v1/convert - Convert an upload and return the workbook
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    info!(filename = %params.filename, bytes = body.len(), "convert request");

    match state.converter.convert(&body, &params.filename) {
        Ok(conversion) => {
            let document = conversion.document;
            (
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(document.mime_type),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        content_disposition(&document.filename),
                    ),
                ],
                document.bytes,
            )
                .into_response()
        }
        Err(e) => error_response(&params.filename, e),
    }
}

/// Map a conversion failure to a status code and JSON error body
fn error_response(filename: &str, error: ConvertError) -> Response {
    let status = match &error {
        ConvertError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(filename, %error, status = status.as_u16(), "conversion failed");

    (
        status,
        Json(ApiResponse::<()>::err(error.status_message())),
    )
        .into_response()
}

/// Characters left unescaped in an RFC 5987 `filename*` value (attr-char)
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment; filename="..."` with characters unsafe in a quoted header
/// value replaced. Names that needed replacing also get a
/// `filename*=UTF-8''...` parameter carrying the exact name (RFC 6266).
pub fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let value = if fallback == filename {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, ATTR_CHAR)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
