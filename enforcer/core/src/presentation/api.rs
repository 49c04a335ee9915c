use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::application::enforcer::BoundaryEnforcer;
use crate::domain::enforcement::{EnforcementRequest, EnforcementStatus};
use serde_json::json;

pub struct AppState {
    pub enforcer: BoundaryEnforcer,
}

pub fn app(enforcer: BoundaryEnforcer) -> Router {
    let state = Arc::new(AppState { enforcer });

    Router::new().route("/", post(enforce)).with_state(state)
}

async fn enforce(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnforcementRequest>,
) -> impl IntoResponse {
    let result = state.enforcer.enforce(&request).await;

    let status =
        StatusCode::from_u16(result.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match result.status {
        EnforcementStatus::Success => json!({ "status": result.message }),
        EnforcementStatus::Error => json!({ "error": result.message }),
    };

    (status, Json(body))
}
