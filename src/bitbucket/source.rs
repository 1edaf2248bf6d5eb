use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use super::client::{cache_key, decode, request_params, ApiClient};
use super::models::{CommitRecord, Page, RepositoryRecord};
use crate::aggregate::CommitSource;
use crate::cache::ResponseCache;
use crate::directory::Credential;
use crate::error::Result;
use crate::models::{Commit, RepositoryDescriptor};

/// `CommitSource` reading through the shared response cache.
///
/// Listings are requested with the default page size only, so each unit is a
/// single upstream call on a miss.
#[derive(Clone)]
pub struct CachedSource {
    client: ApiClient,
    cache: Arc<ResponseCache>,
}

impl CachedSource {
    pub fn new(client: ApiClient, cache: Arc<ResponseCache>) -> Self {
        Self { client, cache }
    }

    async fn fetch_cached(&self, url: Url, token: &str) -> Result<Value> {
        let key = cache_key(&url, &request_params(&[]));
        self.cache
            .get_or_fetch(&key, || async { self.client.fetch(&url, token, &[]).await })
            .await
    }
}

#[async_trait]
impl CommitSource for CachedSource {
    async fn repositories(&self, member: &Credential) -> Result<Vec<RepositoryDescriptor>> {
        let url = self.client.repositories_url(&member.workspace);
        let page: Page<RepositoryRecord> = decode(self.fetch_cached(url, &member.token).await?)?;
        Ok(page.values.into_iter().map(RepositoryDescriptor::from).collect())
    }

    async fn commits(&self, member: &Credential, repo_slug: &str) -> Result<Vec<Commit>> {
        let url = self.client.commits_url(&member.workspace, repo_slug);
        let page: Page<CommitRecord> = decode(self.fetch_cached(url, &member.token).await?)?;
        Ok(page.values.into_iter().map(Commit::from).collect())
    }
}
