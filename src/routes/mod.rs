//! API route handlers - maps HTTP endpoints to the aggregation engine.
//!
//! Each submodule defines routes for a feature area:
//! - `groups`: Group overview (GET /api/admin/groups)
//! - `projects`: Repositories of one workspace
//! - `commits`: Last two commits / up to 100 commits of one repository
//! - `contributions`: Per-repository contribution statistics
//! - `contributors`: Cross-workspace contributor digest
//! - `cache`: Response cache statistics
//! - `member`: Member-facing listings using the caller's own token

pub mod cache;
pub mod commits;
pub mod contributions;
pub mod contributors;
pub mod groups;
pub mod member;
pub mod projects;

use axum::{routing::get, Router};

use crate::state::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health))
        .merge(groups::routes(state.clone()))
        .merge(projects::routes(state.clone()))
        .merge(commits::routes(state.clone()))
        .merge(contributions::routes(state.clone()))
        .merge(contributors::routes(state.clone()))
        .merge(member::routes(state.clone()))
        .merge(cache::routes(state))
}

async fn health() -> &'static str {
    "Workspace dashboard backend is running."
}
