use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One author's most recent commits across every workspace walked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigestEntry {
    pub author: String,
    /// Newest first, at most `MAX_RECENT_COMMITS`
    pub commits: Vec<DigestCommit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigestCommit {
    pub hash: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub project_name: String,
    pub project_slug: String,
    pub workspace_name: String,
}

impl DigestCommit {
    /// Same commit seen through the same repository.
    pub fn same_origin(&self, other: &DigestCommit) -> bool {
        self.hash == other.hash
            && self.project_slug == other.project_slug
            && self.workspace_name == other.workspace_name
    }
}
