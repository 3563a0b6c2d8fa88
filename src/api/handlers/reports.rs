use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use super::tasks::TaskResponse;
use super::users::UserResponse;
use super::{list_response, ListResponse};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentCaller;
use crate::api::state::AppState;
use crate::domain::payment::PaymentSummary;
use crate::domain::stats::{DashboardStats, MemberStats, StateTeam};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub recent_tasks: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    #[serde(flatten)]
    pub summary: PaymentSummary,
    pub history: Vec<TaskResponse>,
}

#[derive(Debug, Serialize)]
pub struct StateTeamResponse {
    pub state: String,
    pub head: Option<UserResponse>,
    pub members: Vec<UserResponse>,
    pub member_count: usize,
}

impl From<&StateTeam> for StateTeamResponse {
    fn from(team: &StateTeam) -> Self {
        Self {
            state: team.state.as_str().to_string(),
            head: team.head.as_ref().map(UserResponse::from),
            members: team.members.iter().map(UserResponse::from).collect(),
            member_count: team.members.len(),
        }
    }
}

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = state.queries.dashboard(&caller).await?;
    Ok(Json(DashboardResponse {
        stats: dashboard.stats,
        recent_tasks: dashboard.recent_task_ids,
    }))
}

/// Caller's earnings and verified task history
///
/// GET /api/payments
pub async fn payments(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<PaymentsResponse>, ApiError> {
    let overview = state.queries.payment_overview(&caller).await?;
    Ok(Json(PaymentsResponse {
        summary: overview.summary,
        history: overview.history.iter().map(TaskResponse::from).collect(),
    }))
}

/// State head's per-member progress
///
/// GET /api/team
pub async fn team_stats(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<ListResponse<MemberStats>>, ApiError> {
    list_response(state.queries.team_stats(&caller).await, MemberStats::clone)
}

/// GET /api/teams
pub async fn teams_by_state(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<ListResponse<StateTeamResponse>>, ApiError> {
    list_response(state.queries.teams_by_state(&caller).await, |t| {
        StateTeamResponse::from(t)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn payments_body_is_flat() {
        let body = PaymentsResponse {
            summary: PaymentSummary::from_tasks(&[], Some(Decimal::from(3)), None),
            history: Vec::new(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["total_paid"], serde_json::json!("3"));
        assert!(value["history"].as_array().unwrap().is_empty());
    }
}
