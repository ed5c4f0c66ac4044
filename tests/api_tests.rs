//! API integration tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use csvsheet::api::server::{ApiConfig, DEFAULT_MAX_UPLOAD_BYTES};
use csvsheet::api::build_router;
use csvsheet::types::CellValue;
use csvsheet::{DocumentReader, XLSX_MIME_TYPE};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    build_router(&ApiConfig::default())
}

fn upload(uri: &str, body: &'static [u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = ApiConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(DEFAULT_MAX_UPLOAD_BYTES, config.max_upload_bytes);
}

#[test]
fn test_config_clone() {
    let config = ApiConfig {
        sheet_name: "Vendas".to_string(),
        ..ApiConfig::default()
    };
    let cloned = config.clone();
    assert_eq!(config.sheet_name, cloned.sheet_name);
    assert_eq!(config.port, cloned.port);
}

// ═══════════════════════════════════════════════════════════════════════════
// INFO ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_root_lists_endpoints() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    let paths: Vec<&str> = json["data"]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(paths.contains(&"/api/v1/convert"));
    assert!(paths.contains(&"/api/v1/preview"));
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "healthy");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_version_reports_sheet_name() {
    let config = ApiConfig {
        sheet_name: "Uploads".to_string(),
        ..ApiConfig::default()
    };
    let response = build_router(&config).oneshot(get("/version")).await.unwrap();

    let json = json_body(response).await;
    assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["data"]["sheet_name"], "Uploads");
}

// ═══════════════════════════════════════════════════════════════════════════
// CONVERT ENDPOINT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_convert_returns_workbook() {
    let response = app()
        .oneshot(upload(
            "/api/v1/convert?filename=people.csv",
            b"name,age\nAlice,30\nBob,\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_MIME_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"people.xlsx\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let table = DocumentReader::new(bytes.to_vec()).read().unwrap();
    assert_eq!(table.column_names(), vec!["name", "age"]);
    assert_eq!(table.rows[0][1], CellValue::Integer(30));
    assert_eq!(table.rows[1][1], CellValue::Empty);
}

#[tokio::test]
async fn test_convert_without_filename_uses_default() {
    let response = app()
        .oneshot(upload("/api/v1/convert", b"a;b\n1;2\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"upload.xlsx\""
    );
}

#[tokio::test]
async fn test_convert_keeps_utf8_filename() {
    let response = app()
        .oneshot(upload(
            "/api/v1/convert?filename=relat%C3%B3rio.csv",
            b"a,b\n1,2\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"relat_rio.xlsx\"; filename*=UTF-8''relat%C3%B3rio.xlsx"
    );
}

#[tokio::test]
async fn test_convert_malformed_is_unprocessable() {
    let response = app()
        .oneshot(upload("/api/v1/convert?filename=bad.csv", b"a,b\n1,2,3\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Check your separator"));
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_convert_binary_is_invalid_file() {
    let response = app()
        .oneshot(upload("/api/v1/convert", &[0xff, 0xfe, 0x00, 0x01]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("not a valid table"));
}

#[tokio::test]
async fn test_convert_encode_failure_is_server_error() {
    let config = ApiConfig {
        sheet_name: "a sheet name longer than thirty one".to_string(),
        ..ApiConfig::default()
    };
    let response = build_router(&config)
        .oneshot(upload("/api/v1/convert", b"a\n1\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process the file"));
}

#[tokio::test]
async fn test_upload_over_limit_rejected() {
    let config = ApiConfig {
        max_upload_bytes: 16,
        ..ApiConfig::default()
    };
    let response = build_router(&config)
        .oneshot(upload(
            "/api/v1/convert",
            b"name,value\nfirst,1\nsecond,2\nthird,3\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ═══════════════════════════════════════════════════════════════════════════
// PREVIEW ENDPOINT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_preview_returns_typed_table() {
    let response = app()
        .oneshot(upload(
            "/api/v1/preview?filename=vendas.csv",
            b"produto;qtd;preco\ncaneta;10;1.5\nlapis;;0.75\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];

    assert_eq!(data["filename"], "vendas.csv");
    assert_eq!(data["output_filename"], "vendas.xlsx");
    assert_eq!(data["delimiter"], "semicolon");
    assert_eq!(data["row_count"], 2);
    assert_eq!(data["column_count"], 3);
    assert_eq!(data["columns"][0]["name"], "produto");
    assert_eq!(data["columns"][1]["kind"], "integer");
    assert_eq!(data["columns"][2]["kind"], "float");
    assert_eq!(data["column_widths"][0], 9);
    assert_eq!(data["rows"][0][1], 10);
    assert_eq!(data["rows"][1][1], Value::Null);
    assert_eq!(data["rows"][1][2], 0.75);
}

#[tokio::test]
async fn test_preview_empty_upload() {
    let response = app()
        .oneshot(upload("/api/v1/preview", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app().oneshot(get("/api/v1/nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
