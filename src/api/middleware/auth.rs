use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::verify_token;
use crate::domain::caller::Caller;

/// Bearer-token extractor yielding the authenticated [`Caller`]
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentCaller(caller): CurrentCaller,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello {}", caller.id()))
/// }
/// ```
pub struct CurrentCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for CurrentCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract the authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        // Extract bearer token
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>")
        })?;

        let claims = verify_token(token, &state.jwt_secret)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        let caller = claims
            .caller()
            .map_err(|e| ApiError::unauthorized(format!("Invalid token profile: {}", e)))?;

        Ok(CurrentCaller(caller))
    }
}
