use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{list_response, ListResponse};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentCaller;
use crate::api::state::AppState;
use crate::domain::user::{BankInfo, Email, ProfileUpdate, Role, User};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub state: Option<String>,
    pub bank_info: Option<BankInfo>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            role: user.role,
            state: user.state.as_ref().map(|s| s.as_str().to_string()),
            bank_info: user.bank_info.clone(),
            created_at: user.created_at,
        }
    }
}

/// Settings form
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub bank_info: Option<BankInfo>,
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.profile(&caller).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let update = ProfileUpdate::new(req.name, Email::new(req.email)?, req.bank_info)?;
    let user = state.accounts.update_profile(&caller, update).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Users visible to the caller
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<ListResponse<UserResponse>>, ApiError> {
    list_response(state.queries.visible_users(&caller).await, |u| {
        UserResponse::from(u)
    })
}
