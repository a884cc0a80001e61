use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn home_router() -> Router {
    Router::new().route("/", get(home))
}

// Service metadata. A store failure is reported as zero users rather than an
// error so the landing page always answers.
async fn home(Extension(state): Extension<AppState>) -> Json<Value> {
    let total_users = state.users.count().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not count users for home page");
        0
    });

    Json(json!({
        "message": format!("Welcome to {}", state.service.name),
        "service": {
            "name": state.service.name,
            "version": state.service.version,
            "environment": state.service.environment,
        },
        "total_users": total_users,
        "endpoints": {
            "GET /": "This endpoint",
            "POST /users": "Create new user",
            "GET /users/{id}": "Get user by Israeli ID",
            "GET /users": "List all user IDs",
            "GET /health": "Health check",
        },
        "timestamp": super::timestamp(),
    }))
}
