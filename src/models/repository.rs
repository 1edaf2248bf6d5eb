use serde::{Deserialize, Serialize};

use crate::bitbucket::models::RepositoryRecord;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_PROJECT: &str = "Default";

/// Repository metadata for the workspace project listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDescriptor {
    pub slug: String,
    pub display_name: String,
    pub uuid: String,
    pub last_updated: Option<String>,
    pub default_branch: String,
    pub project_name: String,
}

impl From<RepositoryRecord> for RepositoryDescriptor {
    fn from(record: RepositoryRecord) -> Self {
        let display_name = if record.name.is_empty() {
            record.slug.clone()
        } else {
            record.name
        };

        Self {
            slug: record.slug,
            display_name,
            uuid: record.uuid,
            last_updated: record.updated_on,
            default_branch: record
                .mainbranch
                .map(|b| b.name)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            project_name: record
                .project
                .map(|p| p.name)
                .unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
        }
    }
}
