//! Integration tests for /api/export and /api/print/layout.

mod common;

use axum::http::StatusCode;
use common::fixtures::{self, RED};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Cursor;

fn png_info(bytes: &[u8]) -> (u32, u32, Option<u32>) {
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
    let info = reader.info();
    (info.width, info.height, info.pixel_dims.map(|d| d.xppu))
}

#[tokio::test]
async fn test_export_front_pocket() {
    let app = TestApp::new();
    let body = json!({
        "image": fixtures::solid_data_uri(60, 30, RED),
        "shirtSize": "L",
        "location": "front_pocket",
    });

    let response = app.post_value("/api/export", &body).await;
    assert_png(&response);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"DTF_Print_L_front_pocket_10cm_300DPI.png\"")
    );
    assert_eq!(response.header("x-quality-warning"), Some("false"));
    assert_eq!(response.header_u64("x-print-width-px"), Some(1181));
    assert_eq!(response.header_u64("x-print-height-px"), Some(591));

    // 300 dpi = 11811 pixels per metre
    assert_eq!(png_info(response.bytes()), (1181, 591, Some(11811)));
}

#[tokio::test]
async fn test_export_default_preset() {
    let app = TestApp::new();
    let body = json!({ "image": fixtures::solid_data_uri(10, 10, RED), "dpi": 100 });

    let response = app.post_value("/api/export", &body).await;
    assert_png(&response);
    // 28 cm at 100 dpi
    assert_eq!(response.header_u64("x-print-width-px"), Some(1102));
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"DTF_Print_M_front_center_28cm_100DPI.png\"")
    );
}

#[tokio::test]
async fn test_export_without_image() {
    let app = TestApp::new();
    let response = app.post_value("/api/export", &json!({ "shirtSize": "M" })).await;
    let message = assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert!(message.contains("No source image"), "{message}");
}

#[tokio::test]
async fn test_export_invalid_width() {
    let app = TestApp::new();
    let body = json!({ "image": fixtures::solid_data_uri(4, 4, RED), "widthCm": -3 });
    assert_json_error(&app.post_value("/api/export", &body).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_layout_defaults() {
    let app = TestApp::new();
    let response = app.get("/api/print/layout").await;
    assert_ok(&response);

    let layout: serde_json::Value = response.json();
    assert_eq!(layout["widthCm"], 28.0);
    assert_eq!(layout["widthPx"], 3307);
    assert_eq!(layout["heightCm"], 33.6);
    assert_eq!(layout["qualityWarning"], false);
}

#[tokio::test]
async fn test_layout_quality_warning() {
    let app = TestApp::new();
    let response = app
        .get("/api/print/layout?shirtSize=XXXL&location=back_center&aspect=0.5")
        .await;
    assert_ok(&response);

    let layout: serde_json::Value = response.json();
    assert_eq!(layout["widthPx"], 4252);
    assert_eq!(layout["heightPx"], 2126);
    assert_eq!(layout["heightCm"], 18.0);
    assert_eq!(layout["qualityWarning"], true);
    assert_eq!(layout["filename"], "DTF_Print_XXXL_back_center_36cm_300DPI.png");
}

#[tokio::test]
async fn test_layout_zero_dpi() {
    let app = TestApp::new();
    let response = app.get("/api/print/layout?dpi=0").await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}
