//! API integration tests against a stubbed classifier backend.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use classifier::{
    ClassifierConfig, ClassifierService, InferenceBackend, OutputLayout, RawModelOutput,
};
use gateway::{routes::create_router, state::AppState};
use ndarray::{Array, IxDyn};
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

/// Backend double answering with a fixed classification-shape response.
struct StubBackend {
    confidences: [f32; 6],
}

impl InferenceBackend for StubBackend {
    fn load_model(_path: &str, _layout: OutputLayout) -> anyhow::Result<Self> {
        anyhow::bail!("the stub backend is constructed directly in tests")
    }

    fn infer(&mut self, _input: &Array<f32, IxDyn>) -> anyhow::Result<RawModelOutput> {
        Ok(RawModelOutput::Distribution(
            Array::from_shape_vec(IxDyn(&[1, 6]), self.confidences.to_vec()).unwrap(),
        ))
    }
}

fn test_app(confidences: [f32; 6]) -> axum::Router {
    let config = ClassifierConfig {
        model_path: "models/best.onnx".to_string(),
        weights_url: None,
        output_layout: OutputLayout::Classification,
        input_size: (640, 640),
        classification_threshold: 0.8,
        prefilter_threshold: 0.25,
        fetch_timeout_secs: 10,
    };
    let service = ClassifierService::new(StubBackend { confidences }, &config).unwrap();
    create_router(AppState {
        service: Arc::new(service),
    })
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_endpoint_answers_ok() {
    let app = test_app([0.0; 6]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn predict_without_body_is_a_validation_error() {
    let app = test_app([0.0; 6]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Error: no image_url provided");
}

#[tokio::test]
async fn predict_with_non_string_url_is_a_validation_error() {
    let app = test_app([0.0; 6]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "image_url": 42 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Error: no image_url provided");
}

#[tokio::test]
async fn predict_with_empty_url_is_a_validation_error() {
    let app = test_app([0.0; 6]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"image_url": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Error: no image_url provided");
}

/// Serves one PNG over a loopback socket so the full fetch-to-decision
/// path runs without leaving the test process.
async fn serve_png_once() -> String {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([40, 90, 20]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    let body = out.into_inner();

    let mut response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/leaf.png", addr)
}

#[tokio::test]
async fn predict_answers_with_the_bare_decision_string() {
    let url = serve_png_once().await;
    let app = test_app([0.05, 0.02, 0.03, 0.01, 0.85, 0.04]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "image_url": url }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Java Tea");
}

#[tokio::test]
async fn low_confidence_prediction_is_not_a_herb() {
    let url = serve_png_once().await;
    let app = test_app([0.5, 0.5, 0.0, 0.0, 0.0, 0.0]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "image_url": url }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Not a Herb");
}
