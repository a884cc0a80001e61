use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::state::AppState;

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health(Extension(state): Extension<AppState>) -> Result<Json<Value>> {
    let database = state.users.health().await;
    let Some(users_count) = database.user_count else {
        return Err(ApiError::StoreUnavailable);
    };

    Ok(Json(json!({
        "message": "Service is healthy",
        "status": "healthy",
        "service": state.service.name,
        "version": state.service.version,
        "users_count": users_count,
        "database": database,
        "timestamp": super::timestamp(),
    })))
}
