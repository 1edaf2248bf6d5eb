use std::sync::Arc;

use crate::aggregate::WalkPolicy;
use crate::bitbucket::{ApiClient, CachedSource};
use crate::cache::ResponseCache;
use crate::directory::{Credential, CredentialDirectory};
use crate::error::{AppError, Result};

/// Services shared by every request handler.
pub struct AppState {
    pub client: ApiClient,
    pub cache: Arc<ResponseCache>,
    pub directory: Arc<dyn CredentialDirectory>,
    pub walk_policy: WalkPolicy,
}

impl AppState {
    /// Resolve the member owning `workspace`, before any upstream call is made.
    pub async fn credential_for(&self, workspace: &str) -> Result<Credential> {
        self.directory
            .find_by_workspace(workspace)
            .await?
            .ok_or_else(|| AppError::WorkspaceNotFound(workspace.to_string()))
    }

    pub fn cached_source(&self) -> CachedSource {
        CachedSource::new(self.client.clone(), self.cache.clone())
    }
}

pub type SharedState = Arc<AppState>;
