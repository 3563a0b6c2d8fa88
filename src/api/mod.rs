// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{auth, reports, tasks, users};
pub use state::AppState;

/// Builds the full HTTP surface with tracing and CORS layers
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Own profile and settings
        .route("/api/me", get(users::me).put(users::update_me))
        // Task lifecycle
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/:id", get(tasks::get_task))
        .route("/api/tasks/:id/submit", post(tasks::submit_task))
        .route("/api/tasks/:id/approve", post(tasks::approve_task))
        .route("/api/tasks/:id/reject", post(tasks::reject_task))
        .route("/api/tasks/:id/verify", post(tasks::verify_task))
        .route("/api/verification", get(tasks::verification_queue))
        // People
        .route("/api/users", get(users::list_users))
        .route("/api/team", get(reports::team_stats))
        .route("/api/teams", get(reports::teams_by_state))
        // Read models
        .route("/api/dashboard", get(reports::dashboard))
        .route("/api/payments", get(reports::payments))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
