//! Per-repository contribution statistics.
//!
//! GET /api/admin/contributions/{workspace}/{repo}
//!
//! Fetches up to 100 commits (uncached) and aggregates them against the
//! current time: today / last 7 days / last 30 days counts, per-author stats
//! with percentage of total, and a per-day timeline. Calendar days are UTC.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::aggregate::aggregate;
use crate::error::Result;
use crate::models::{Commit, ContributionSummary};
use crate::state::SharedState;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/contributions/{workspace}/{repo}", get(contributions))
        .with_state(state)
}

async fn contributions(
    State(state): State<SharedState>,
    Path((workspace, repo)): Path<(String, String)>,
) -> Result<Json<ContributionSummary>> {
    let member = state.credential_for(&workspace).await?;
    let page = state
        .client
        .list_commits(&workspace, &repo, &member.token, &[])
        .await?;

    let commits: Vec<Commit> = page.values.into_iter().map(Commit::from).collect();
    Ok(Json(aggregate(&commits, Utc::now())))
}
