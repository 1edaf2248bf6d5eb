//! Workspace repository listing.
//!
//! GET /api/admin/workspace-projects/{workspace}
//!
//! Returns one `RepositoryDescriptor` per repository, straight from the
//! upstream API (uncached). Used by: workspace dashboard project list

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::RepositoryDescriptor;
use crate::state::SharedState;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/workspace-projects/{workspace}", get(workspace_projects))
        .with_state(state)
}

async fn workspace_projects(
    State(state): State<SharedState>,
    Path(workspace): Path<String>,
) -> Result<Json<Vec<RepositoryDescriptor>>> {
    let member = state.credential_for(&workspace).await?;
    let page = state
        .client
        .list_repositories(&workspace, &member.token, &[])
        .await?;
    Ok(Json(
        page.values.into_iter().map(RepositoryDescriptor::from).collect(),
    ))
}
