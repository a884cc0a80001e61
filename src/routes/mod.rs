use axum::{
    extract::Extension,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use chrono::{SecondsFormat, Utc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::state::AppState;

pub mod health;
pub mod home;
pub mod users;

use health::health_router;
use home::home_router;
use users::users_router;

/// Generation time stamped on every response body.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Assemble the whole service.
pub fn app(state: AppState) -> Router {
    Router::new()
        // GET /
        .merge(home_router())
        // GET /health
        .merge(health_router())
        // POST /users, GET /users, GET /users/{id}
        .nest("/users", users_router())
        .fallback(not_found)
        .layer(middleware::map_response(method_not_allowed_as_json))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

// The router answers a known path with a wrong method by an empty 405; give it
// the same JSON body as every other error, keeping the Allow header.
async fn method_not_allowed_as_json(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}
