//! Wire types for the upstream REST API.
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! upstream payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default)]
    pub values: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRecord {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub updated_on: Option<String>,
    #[serde(default)]
    pub mainbranch: Option<NamedRef>,
    #[serde(default)]
    pub project: Option<NamedRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    pub author: CommitAuthor,
    #[serde(default)]
    pub links: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub raw: String,
}
