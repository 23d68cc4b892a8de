//! HTTP surface of the recommendation backend

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::gemini::TextGenerator;
use crate::models::Destination;
use crate::recommend::recommend;
use crate::RecommendError;

/// Shared handler state: the provider behind its capability interface
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TextGenerator>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// `text` stays loosely typed on purpose: a non-string value must produce
/// the backend's own 400 payload, not a framework rejection.
#[derive(Deserialize)]
pub struct EchoRequest {
    #[serde(default)]
    text: Option<Value>,
    /// Destination names the model should not suggest again
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    message: String,
    received_text: String,
    destinations: Vec<Destination>,
}

#[derive(Serialize)]
pub struct ModelListResponse {
    models: Vec<String>,
}

/// Failure payload; `destinations` is always empty, never partial
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    destinations: Vec<Destination>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/echo", post(echo))
        .route("/models", get(models))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Backend is running",
    })
}

async fn echo(
    State(state): State<AppState>,
    Json(payload): Json<EchoRequest>,
) -> Result<Json<EchoResponse>, ApiError> {
    let text = payload
        .text
        .as_ref()
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    match recommend(state.provider.as_ref(), &text, &payload.exclude).await {
        Ok(destinations) => {
            info!(count = destinations.len(), "served recommendations");
            Ok(Json(EchoResponse {
                message: format!("Found {} destinations", destinations.len()),
                received_text: text,
                destinations,
            }))
        }
        Err(err) => Err(reject(err)),
    }
}

async fn models(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    match state.provider.list_models().await {
        Ok(models) => Ok(Json(ModelListResponse { models })),
        Err(err) => Err(reject(RecommendError::from(err))),
    }
}

/// Classifies a pipeline error into the stable wire shape. The full error
/// is logged here; the body only ever carries the user-facing message.
fn reject(err: RecommendError) -> ApiError {
    error!(error = %err, "request failed");
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.user_message(),
            destinations: Vec::new(),
        }),
    )
}
