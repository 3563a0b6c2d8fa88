//! Task Board API Library
//!
//! Role-based task assignment for state teams: the task lifecycle state
//! machine, role-scoped visibility, payment read models and the HTTP
//! adapter over them.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
