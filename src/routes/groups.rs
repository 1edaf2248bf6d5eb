//! Group overview.
//!
//! GET /api/admin/groups
//!
//! Groups sorted by group number with their members' names and workspaces.
//! 404 when nobody is registered.

use axum::{extract::State, routing::get, Json, Router};

use crate::error::{AppError, Result};
use crate::models::GroupSummary;
use crate::state::SharedState;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/groups", get(list_groups))
        .with_state(state)
}

async fn list_groups(State(state): State<SharedState>) -> Result<Json<Vec<GroupSummary>>> {
    let groups = state.directory.list_groups_with_members().await?;
    if groups.is_empty() {
        return Err(AppError::NoGroups);
    }
    Ok(Json(groups.iter().map(GroupSummary::from).collect()))
}
