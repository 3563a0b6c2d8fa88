use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::UserResponse;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::domain::caller::Caller;
use crate::domain::user::Role;
use crate::services::Registration;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub state: Option<String>,
}

/// Response from successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .accounts
        .register(Registration {
            email: req.email,
            password: req.password,
            name: req.name,
            role: req.role,
            state: req.state,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .accounts
        .authenticate(&req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let caller = Caller::from_user(&user)?;
    let token = create_token(&caller, &state.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
