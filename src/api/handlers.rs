//! HTTP request handlers

use super::sse::snapshot_stream;
use super::types::{CallResponse, ErrorResponse, SubmitRequest, SubmitResponse};
use super::AppState;
use crate::profile::BusinessProfile;
use crate::session::SubmitOutcome;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Call lifecycle
        .route("/api/call", get(get_call))
        .route("/api/call/start", post(start_call))
        .route("/api/call/submit", post(submit_utterance))
        .route("/api/call/reset", post(reset_call))
        .route("/api/call/stream", get(stream_call))
        // Business profile
        .route("/api/profile", get(get_profile).put(update_profile))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Call Lifecycle
// ============================================================

async fn get_call(State(state): State<AppState>) -> Json<CallResponse> {
    let call = state.call.lock().await.snapshot();
    Json(CallResponse { call })
}

async fn start_call(State(state): State<AppState>) -> Json<CallResponse> {
    let mut controller = state.call.lock().await;
    controller.start();
    let call = controller.snapshot();
    // Publish under the lock so subscribers see mutations in order
    state.publish(&call);
    Json(CallResponse { call })
}

async fn submit_utterance(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let mut controller = state.call.lock().await;
    let outcome = controller.submit(&req.text).await;
    let call = controller.snapshot();

    match outcome {
        SubmitOutcome::Accepted { caller_entry, .. } => {
            state.publish(&call);
            Ok(Json(SubmitResponse {
                accepted: true,
                caller_entry: Some(caller_entry),
                ignored_reason: None,
                call,
            }))
        }
        SubmitOutcome::Ignored(reason) => Ok(Json(SubmitResponse {
            accepted: false,
            caller_entry: None,
            ignored_reason: Some(reason.into()),
            call,
        })),
        SubmitOutcome::CollaboratorFailed(error) => Err(AppError::Upstream(error.to_string())),
    }
}

async fn reset_call(State(state): State<AppState>) -> Json<CallResponse> {
    let mut controller = state.call.lock().await;
    controller.reset();
    let call = controller.snapshot();
    state.publish(&call);
    Json(CallResponse { call })
}

async fn stream_call(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no update is missed
    let updates = state.updates.subscribe();
    let initial = state.call.lock().await.snapshot();
    snapshot_stream(initial, updates)
}

// ============================================================
// Business Profile
// ============================================================

async fn get_profile(State(state): State<AppState>) -> Json<BusinessProfile> {
    let profile = state.profiles.get().await;
    Json((*profile).clone())
}

async fn update_profile(
    State(state): State<AppState>,
    Json(profile): Json<BusinessProfile>,
) -> Result<Json<BusinessProfile>, AppError> {
    // The controller guard keeps the store and the next-call profile in step
    let mut controller = state.call.lock().await;
    let profile = state
        .profiles
        .replace(profile)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    controller.set_profile(Arc::clone(&profile));
    Ok(Json((*profile).clone()))
}

async fn get_version() -> &'static str {
    concat!("callsim ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
