use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::Json as RespJson,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::model::israeli_id;
use crate::model::user::{CreateUserRequest, NewUser, User};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct UserResponse {
    message: &'static str,
    user: User,
    timestamp: String,
}

impl UserResponse {
    fn new(message: &'static str, user: User) -> Self {
        Self {
            message,
            user,
            timestamp: super::timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserIdsResponse {
    message: &'static str,
    users: Vec<String>,
    count: usize,
    timestamp: String,
}

// Create users router
pub fn users_router() -> Router {
    Router::new()
        .route("/", post(create_user)) // POST /users
        .route("/", get(list_users)) // GET /users
        .route("/:id", get(get_user)) // GET /users/{id}
}

async fn create_user(
    Extension(state): Extension<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, RespJson<UserResponse>)> {
    let Json(request) = payload?;
    let new_user = NewUser::parse(request)?;

    let user = state.users.create(new_user).await?;
    tracing::info!(user_id = %user.id, name = %user.name, "user created");

    Ok((
        StatusCode::CREATED,
        RespJson(UserResponse::new("User created successfully", user)),
    ))
}

// The id is checked before the store is touched.
async fn get_user(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<RespJson<UserResponse>> {
    if let Err(source) = israeli_id::validate(&id) {
        return Err(ApiError::InvalidId {
            user_id: id,
            source,
        });
    }

    let user = state.users.get(&id).await?;
    tracing::info!(user_id = %user.id, "user retrieved");

    Ok(RespJson(UserResponse::new("User retrieved successfully", user)))
}

async fn list_users(Extension(state): Extension<AppState>) -> Result<RespJson<UserIdsResponse>> {
    let users = state.users.list_ids().await?;

    Ok(RespJson(UserIdsResponse {
        message: "Users listed successfully",
        count: users.len(),
        users,
        timestamp: super::timestamp(),
    }))
}
