//! Credential directory: read-only view of registered members by group.
//!
//! The account store itself (registration, passwords, token storage) lives
//! outside this service. `JsonFileDirectory` reads its member export on every
//! call so a traversal always sees current registrations; nothing is kept
//! between requests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Everything needed to act on one member's workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub member_name: String,
    pub workspace: String,
    pub group: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub members: Vec<Credential>,
}

#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    /// All groups, ascending by group id, members in registration order.
    async fn list_groups_with_members(&self) -> Result<Vec<Group>>;

    async fn find_by_workspace(&self, workspace: &str) -> Result<Option<Credential>> {
        let groups = self.list_groups_with_members().await?;
        Ok(groups
            .into_iter()
            .flat_map(|g| g.members)
            .find(|m| m.workspace == workspace))
    }
}

/// Bucket members by group id. Group order is ascending, member order is kept.
pub fn group_members(members: impl IntoIterator<Item = Credential>) -> Vec<Group> {
    let mut groups: BTreeMap<String, Vec<Credential>> = BTreeMap::new();
    for member in members {
        groups.entry(member.group.clone()).or_default().push(member);
    }
    groups
        .into_iter()
        .map(|(id, members)| Group { id, members })
        .collect()
}

/// Member record as exported by the account store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberRecord {
    name: String,
    group_number: String,
    workspace_name: String,
    token: String,
}

impl From<MemberRecord> for Credential {
    fn from(record: MemberRecord) -> Self {
        Self {
            member_name: record.name,
            workspace: record.workspace_name,
            group: record.group_number,
            token: record.token,
        }
    }
}

/// Directory backed by a JSON array of member records on disk.
pub struct JsonFileDirectory {
    path: PathBuf,
}

impl JsonFileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Credential>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Directory(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        let records: Vec<MemberRecord> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Directory(format!("Cannot parse {}: {}", self.path.display(), e))
        })?;
        Ok(records.into_iter().map(Credential::from).collect())
    }
}

#[async_trait]
impl CredentialDirectory for JsonFileDirectory {
    async fn list_groups_with_members(&self) -> Result<Vec<Group>> {
        Ok(group_members(self.load().await?))
    }

    async fn find_by_workspace(&self, workspace: &str) -> Result<Option<Credential>> {
        Ok(self.load().await?.into_iter().find(|m| m.workspace == workspace))
    }
}
