use std::sync::Arc;

use crate::domain::repositories::Repositories;
use crate::services::{AccountService, TaskLifecycleService, TaskQueryService};

/// Shared handler state: services over one set of store ports
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub lifecycle: TaskLifecycleService,
    pub queries: TaskQueryService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(repos: Repositories, jwt_secret: &str) -> Self {
        Self {
            accounts: AccountService::new(repos.clone()),
            lifecycle: TaskLifecycleService::new(repos.clone()),
            queries: TaskQueryService::new(repos),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
