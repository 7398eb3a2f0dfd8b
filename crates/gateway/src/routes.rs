use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use classifier::{ClassifyError, InferenceBackend};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

pub fn create_router<B>(state: AppState<B>) -> Router
where
    B: InferenceBackend + Send + 'static,
{
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    image_url: String,
}

/// Expects JSON `{ "image_url": "<public_url>" }` and answers with the
/// bare decision string as plain text.
async fn predict<B>(
    State(state): State<AppState<B>>,
    payload: Option<Json<PredictRequest>>,
) -> Response
where
    B: InferenceBackend + Send + 'static,
{
    let Some(Json(request)) = payload else {
        tracing::warn!("predict request without a usable image_url field");
        return plain(
            StatusCode::BAD_REQUEST,
            "Error: no image_url provided".to_string(),
        );
    };

    match state.service.classify(&request.image_url).await {
        Ok(decision) => plain(StatusCode::OK, decision.label().to_string()),
        Err(e) => error_response(e),
    }
}

fn plain(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Caller mistakes get the specific cause; internal faults get a generic
/// body while the cause stays in the logs.
fn error_response(error: ClassifyError) -> Response {
    if error.is_client_error() {
        tracing::warn!(error = %error, "prediction rejected");
        plain(StatusCode::BAD_REQUEST, format!("Error: {}", error))
    } else {
        tracing::error!(error = %error, "prediction failed");
        plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: internal error during prediction".to_string(),
        )
    }
}
