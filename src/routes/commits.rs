//! Commit listings for one repository. Always uncached.
//!
//! - GET /api/admin/commits/{workspace}/{repo}
//!   The two most recent commits. Used by the workspace dashboard cards.
//!
//! - GET /api/admin/all-commits/{workspace}/{repo}
//!   Up to 100 commits, newest first.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::Commit;
use crate::state::SharedState;

const NEWEST_FIRST: (&str, &str) = ("sort", "-date");

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/commits/{workspace}/{repo}", get(last_two_commits))
        .route("/api/admin/all-commits/{workspace}/{repo}", get(all_commits))
        .with_state(state)
}

async fn last_two_commits(
    State(state): State<SharedState>,
    Path((workspace, repo)): Path<(String, String)>,
) -> Result<Json<Vec<Commit>>> {
    list_commits(&state, &workspace, &repo, "2").await.map(Json)
}

async fn all_commits(
    State(state): State<SharedState>,
    Path((workspace, repo)): Path<(String, String)>,
) -> Result<Json<Vec<Commit>>> {
    list_commits(&state, &workspace, &repo, "100").await.map(Json)
}

async fn list_commits(
    state: &SharedState,
    workspace: &str,
    repo: &str,
    page_len: &str,
) -> Result<Vec<Commit>> {
    let member = state.credential_for(workspace).await?;
    let page = state
        .client
        .list_commits(workspace, repo, &member.token, &[("pagelen", page_len), NEWEST_FIRST])
        .await?;
    Ok(page.values.into_iter().map(Commit::from).collect())
}
