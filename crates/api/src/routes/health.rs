//! Liveness endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use checkout::CheckoutStep;
use common::SessionId;
use serde::Serialize;

use super::checkout::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub session_id: SessionId,
    pub step: CheckoutStep,
}

/// GET /health: the service is up, with the session it is serving.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        session_id: state.controller.session_id(),
        step: state.controller.step(),
    })
}
