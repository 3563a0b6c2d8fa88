use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{list_response, ListResponse};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentCaller;
use crate::api::state::AppState;
use crate::domain::task::{NewTask, Reward, Task, TaskStatus, TaskSubmission};
use crate::services::SubmitProof;

/// Request body for assigning a task
///
/// `reward` accepts a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: Uuid,
    pub reward: serde_json::Value,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    pub proof_text: String,
    #[serde(default)]
    pub proof_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectTaskRequest {
    pub reason: Option<String>,
}

/// Query string of GET /api/tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Comma separated statuses, e.g. `submitted,approved`
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_by_me: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
    pub state: String,
    pub reward: Decimal,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            assigned_to: task.assigned_to(),
            assigned_by: task.assigned_by(),
            state: task.state().as_str().to_string(),
            reward: task.reward().amount(),
            status: task.status(),
            due_date: task.due_date(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            approved_by: task.approved_by(),
            approved_at: task.approved_at(),
            verified_by: task.verified_by(),
            verified_at: task.verified_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub submissions: Vec<TaskSubmission>,
}

fn parse_reward(value: &serde_json::Value) -> Result<Reward, ApiError> {
    let raw = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => {
            return Err(ApiError::bad_request(format!(
                "Invalid input: reward must be a number, got {}",
                other
            )))
        }
    };
    Ok(raw.parse::<Reward>()?)
}

fn parse_statuses(raw: Option<&str>) -> Result<Vec<TaskStatus>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<TaskStatus>().map_err(ApiError::from))
        .collect()
}

/// Tasks visible to the caller
///
/// GET /api/tasks?status=submitted,approved&assigned_by_me=true
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ListResponse<TaskResponse>>, ApiError> {
    let statuses = parse_statuses(query.status.as_deref())?;
    let result = state
        .queries
        .visible_tasks(&caller, &statuses, query.assigned_by_me)
        .await;
    list_response(result, |t| TaskResponse::from(t))
}

/// Assign a new task
///
/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let new = NewTask {
        title: req.title,
        description: req.description,
        assigned_to: req.assigned_to,
        reward: parse_reward(&req.reward)?,
        due_date: req.due_date,
    };
    let task = state.lifecycle.create_task(&caller, new).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// A visible task with its submissions
///
/// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskDetailResponse>, ApiError> {
    let detail = state.queries.task_detail(&caller, id).await?;
    Ok(Json(TaskDetailResponse {
        task: TaskResponse::from(&detail.task),
        submissions: detail.submissions,
    }))
}

/// POST /api/tasks/:id/submit
pub async fn submit_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let proof = SubmitProof {
        proof_text: req.proof_text,
        proof_files: req.proof_files,
    };
    let task = state.lifecycle.submit(&caller, id, proof).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// POST /api/tasks/:id/approve
pub async fn approve_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.lifecycle.approve(&caller, id).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// POST /api/tasks/:id/reject
///
/// The body is optional; `{"reason": "..."}` is stored on the submission.
pub async fn reject_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectTaskRequest>>,
) -> Result<Json<TaskResponse>, ApiError> {
    let reason = body.and_then(|Json(req)| req.reason);
    let task = state.lifecycle.reject(&caller, id, reason).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// POST /api/tasks/:id/verify
pub async fn verify_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.lifecycle.verify(&caller, id).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// GET /api/verification
pub async fn verification_queue(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<ListResponse<TaskResponse>>, ApiError> {
    list_response(state.queries.verification_queue(&caller).await, |t| {
        TaskResponse::from(t)
    })
}
