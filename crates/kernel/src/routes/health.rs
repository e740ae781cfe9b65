//! Health check endpoint.
//!
//! Always returns 200 OK once the server is up; reports whether accepted
//! submissions can be mailed.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    mail: bool,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mail = state.mailer().is_some() && state.config().has_contact_recipients();
    Json(HealthResponse {
        status: "healthy",
        mail,
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
