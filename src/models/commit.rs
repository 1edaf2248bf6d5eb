use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bitbucket::models::CommitRecord;

/// A single commit as returned by the commit-list endpoints.
///
/// `author` is the raw upstream author string (usually `Name <email>`) and is
/// used verbatim as the grouping key everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub hash: String,
    pub date: DateTime<Utc>,
    pub message: String,
    pub author: String,
    #[serde(default)]
    pub links: serde_json::Value,
}

impl From<CommitRecord> for Commit {
    fn from(record: CommitRecord) -> Self {
        Self {
            hash: record.hash,
            date: record.date,
            message: record.message,
            author: record.author.raw,
            links: record.links,
        }
    }
}

/// Name part of a raw author string, for display only.
pub fn display_name(raw: &str) -> &str {
    let name = raw.split_once('<').map_or(raw, |(name, _)| name).trim();
    if name.is_empty() { raw.trim() } else { name }
}
