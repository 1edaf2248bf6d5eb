//! Member-facing listings, authenticated with the caller's own token.
//!
//! - GET /api/projects?workspace=
//!   Repositories of the workspace.
//!
//! - GET /api/commits?workspace=&repoSlug=
//!   Up to 100 commits of one repository.
//!
//! The token is taken from `Authorization: Bearer <token>` and forwarded to
//! the upstream API unchanged; the credential directory is not consulted.
//! Always uncached. Used by: member dashboard

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Commit, RepositoryDescriptor};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    pub workspace: Option<String>,
    pub repo_slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub repositories: Vec<RepositoryDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct CommitsResponse {
    pub success: bool,
    pub commits: Vec<Commit>,
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/projects", get(projects))
        .route("/api/commits", get(commits))
        .with_state(state)
}

async fn projects(
    State(state): State<SharedState>,
    Query(query): Query<MemberQuery>,
    headers: HeaderMap,
) -> Result<Json<ProjectsResponse>> {
    let (Some(workspace), Some(token)) = (present(&query.workspace), bearer_token(&headers)) else {
        return Err(AppError::BadRequest(
            "Workspace and access token are required.".to_string(),
        ));
    };

    let page = state.client.list_repositories(workspace, token, &[]).await?;
    Ok(Json(ProjectsResponse {
        success: true,
        repositories: page.values.into_iter().map(RepositoryDescriptor::from).collect(),
    }))
}

async fn commits(
    State(state): State<SharedState>,
    Query(query): Query<MemberQuery>,
    headers: HeaderMap,
) -> Result<Json<CommitsResponse>> {
    let (Some(workspace), Some(repo_slug), Some(token)) = (
        present(&query.workspace),
        present(&query.repo_slug),
        bearer_token(&headers),
    ) else {
        return Err(AppError::BadRequest(
            "Workspace, repoSlug, and access token are required.".to_string(),
        ));
    };

    let page = state
        .client
        .list_commits(workspace, repo_slug, token, &[])
        .await?;
    Ok(Json(CommitsResponse {
        success: true,
        commits: page.values.into_iter().map(Commit::from).collect(),
    }))
}

/// Token part of a `Bearer` authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
