// HTTP handlers grouped by resource

pub mod auth;
pub mod reports;
pub mod tasks;
pub mod users;

use axum::Json;
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::domain::errors::{DomainError, DomainResult};

/// Body of every list endpoint
///
/// A store outage yields an empty list with `error` set instead of a
/// failed request, so the page still renders with a banner.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

pub(crate) fn list_response<T, U>(
    result: DomainResult<Vec<T>>,
    to_item: impl Fn(&T) -> U,
) -> Result<Json<ListResponse<U>>, ApiError> {
    match result {
        Ok(rows) => Ok(Json(ListResponse {
            items: rows.iter().map(to_item).collect(),
            error: None,
        })),
        Err(DomainError::StoreUnavailable(reason)) => {
            tracing::warn!(error = %reason, "List read failed, returning empty list");
            Ok(Json(ListResponse {
                items: Vec::new(),
                error: Some("Could not load data, please try again".to_string()),
            }))
        }
        Err(e) => Err(e.into()),
    }
}
