use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use plant_predict::{
    config::Config,
    labels::{CLASS_LABELS, NUM_CLASSES},
    models::PlantModel,
    web::create_app,
    Result,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "x-plant-predict-test-boundary";

/// Deterministic stand-in for the ONNX session: always returns the same
/// probability vector, peaked at one class.
struct FixedModel {
    peak_index: usize,
}

impl PlantModel for FixedModel {
    fn infer(&self, _input: Array4<f32>) -> Result<Vec<f32>> {
        let rest = 0.3 / (NUM_CLASSES - 1) as f32;
        let mut probs = vec![rest; NUM_CLASSES];
        probs[self.peak_index] = 0.7;
        Ok(probs)
    }
}

fn test_app(spool_dir: &TempDir) -> axum::Router {
    let config = Config::new(
        "127.0.0.1:0".to_string(),
        PathBuf::from("unused-by-mock.onnx"),
        Some(spool_dir.path().to_path_buf()),
        Some(1),
    )
    .unwrap();

    create_app(Arc::new(FixedModel { peak_index: 5 }), config)
}

fn png_bytes() -> Vec<u8> {
    let mut img = RgbImage::new(64, 64);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 4) as u8, (y * 4) as u8, 100]);
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn file_part(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn predict_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body["message"],
        "Welcome to the Plant Prediction API! Use /predict to classify images."
    );
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    // A well-formed multipart body that carries no "file" field at all.
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, r#"{"error":"No file provided"}"#);
}

#[tokio::test]
async fn empty_filename_is_rejected() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let body = file_part("", "image/png", &png_bytes());
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, r#"{"error":"No selected file"}"#);
}

#[tokio::test]
async fn valid_upload_returns_top1_prediction() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let body = file_part("leaf.png", "image/png", &png_bytes());
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let raw = body_string(response).await;

    // Key order on the wire matters to downstream clients.
    let plant_pos = raw.find("\"plant\"").unwrap();
    let confidence_pos = raw.find("\"confidence\"").unwrap();
    assert!(plant_pos < confidence_pos);

    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_object().unwrap().len(), 2);
    let plant = parsed["plant"].as_str().unwrap();
    assert!(CLASS_LABELS.contains(&plant));
    assert_eq!(plant, CLASS_LABELS[5]);
    let confidence = parsed["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert!((confidence - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn same_image_yields_identical_response() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let bytes = png_bytes();
    let first = app
        .clone()
        .oneshot(predict_request(file_part("leaf.png", "image/png", &bytes)))
        .await
        .unwrap();
    let second = app
        .oneshot(predict_request(file_part("leaf.png", "image/png", &bytes)))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_string(first).await, body_string(second).await);
}

#[tokio::test]
async fn undecodable_upload_is_a_client_error() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let body = file_part("leaf.png", "image/png", b"this is not a png");
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(parsed["error"].is_string());
}

#[tokio::test]
async fn non_image_content_type_is_rejected() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    let body = file_part("notes.txt", "text/plain", b"just text");
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn no_spool_file_survives_any_request() {
    let spool = TempDir::new().unwrap();
    let app = test_app(&spool);

    // Success path.
    let response = app
        .clone()
        .oneshot(predict_request(file_part("leaf.png", "image/png", &png_bytes())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Failure path: the upload spools fine but fails to decode.
    let response = app
        .oneshot(predict_request(file_part("bad.png", "image/png", b"garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let leftovers: Vec<_> = std::fs::read_dir(spool.path())
        .unwrap()
        .collect::<std::io::Result<Vec<_>>>()
        .unwrap();
    assert!(
        leftovers.is_empty(),
        "spool directory not empty: {:?}",
        leftovers
    );
}
