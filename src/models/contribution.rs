//! Per-repository contribution statistics.
//!
//! Produced by `aggregate::contributions::aggregate` for one repository's
//! commit list. Window counts overlap: a commit from today also counts toward
//! the last week and the last month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub total_commits: usize,
    pub today_commits: usize,
    pub last_week_commits: usize,
    pub last_month_commits: usize,
    /// Keyed by raw author string
    pub author_stats: BTreeMap<String, AuthorStats>,
    /// One entry per calendar date (UTC), oldest first
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub total_commits: usize,
    pub today_commits: usize,
    pub last_week_commits: usize,
    pub last_month_commits: usize,
    /// Share of the repository's commits, one decimal place
    pub percentage_of_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub total: usize,
    pub authors: BTreeMap<String, usize>,
}
