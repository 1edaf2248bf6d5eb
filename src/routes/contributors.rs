//! Cross-workspace contributor digest.
//!
//! GET /api/admin/all-contributors
//!
//! Walks every member of every group through the response cache and returns
//! each author's three most recent commits across all of their repositories.
//! Units that fail upstream are skipped and logged; the endpoint itself only
//! fails when the credential directory cannot be read.

use axum::{extract::State, routing::get, Json, Router};

use crate::aggregate::FanOutWalker;
use crate::error::Result;
use crate::models::DigestEntry;
use crate::state::SharedState;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/admin/all-contributors", get(all_contributors))
        .with_state(state)
}

async fn all_contributors(State(state): State<SharedState>) -> Result<Json<Vec<DigestEntry>>> {
    let groups = state.directory.list_groups_with_members().await?;

    let walker = FanOutWalker::new(state.cached_source(), state.walk_policy);
    let report = walker.walk_all(&groups).await;

    if !report.failures.is_empty() {
        tracing::warn!(
            failures = report.failures.len(),
            "contributor digest is partial"
        );
    }

    Ok(Json(report.digest.into_entries()))
}
