//! Fan-out walk over group → member → repository → commit.
//!
//! Members are walked one at a time by default (`WalkPolicy::concurrency == 1`)
//! and each member's repositories strictly in order, so the upstream API sees
//! at most one request in flight per walk. The upstream rate limit is per
//! credential and shared with every other client of the same workspace.
//!
//! Each repository listing and each commit listing is one unit. A failed unit
//! is logged, recorded in `WalkReport::failures` and skipped; it never aborts
//! the walk.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use thiserror::Error;

use super::digest::ContributorDigest;
use crate::directory::{Credential, Group};
use crate::error::Result;
use crate::models::{display_name, Commit, DigestCommit, RepositoryDescriptor};

/// Where the walker gets repositories and commits from.
#[async_trait]
pub trait CommitSource: Send + Sync {
    async fn repositories(&self, member: &Credential) -> Result<Vec<RepositoryDescriptor>>;

    async fn commits(&self, member: &Credential, repo_slug: &str) -> Result<Vec<Commit>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkPolicy {
    /// Members walked at once. Repositories of one member are always sequential.
    pub concurrency: usize,
    /// Stop starting new units once this much time has passed.
    pub deadline: Option<Duration>,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkFailure {
    #[error("repositories of {workspace}: {reason}")]
    Repositories { workspace: String, reason: String },

    #[error("commits of {workspace}/{repository}: {reason}")]
    Commits {
        workspace: String,
        repository: String,
        reason: String,
    },

    #[error("deadline reached before {workspace} was walked")]
    DeadlineExceeded { workspace: String },
}

/// Commits fetched for one repository.
#[derive(Debug)]
struct RepositoryCommits {
    workspace: String,
    repository: RepositoryDescriptor,
    commits: Vec<Commit>,
}

type UnitResult = std::result::Result<RepositoryCommits, WalkFailure>;

#[derive(Debug, Default)]
pub struct WalkReport {
    pub digest: ContributorDigest,
    pub failures: Vec<WalkFailure>,
    pub members: usize,
    pub repositories: usize,
    pub commits: usize,
}

impl WalkReport {
    fn absorb(&mut self, unit: UnitResult) {
        match unit {
            Ok(found) => {
                self.repositories += 1;
                self.commits += found.commits.len();
                for commit in found.commits {
                    let author = commit.author;
                    self.digest.merge_commit(
                        &author,
                        DigestCommit {
                            hash: commit.hash,
                            message: commit.message,
                            date: commit.date,
                            project_name: found.repository.display_name.clone(),
                            project_slug: found.repository.slug.clone(),
                            workspace_name: found.workspace.clone(),
                        },
                    );
                }
            }
            Err(failure) => {
                tracing::warn!("skipping unit: {}", failure);
                self.failures.push(failure);
            }
        }
    }
}

pub struct FanOutWalker<S> {
    source: S,
    policy: WalkPolicy,
}

impl<S: CommitSource> FanOutWalker<S> {
    pub fn new(source: S, policy: WalkPolicy) -> Self {
        Self { source, policy }
    }

    /// Walk every member of every group and merge all commits into one digest.
    ///
    /// Groups are taken in the order given, members within a group likewise.
    pub async fn walk_all(&self, groups: &[Group]) -> WalkReport {
        let started = Instant::now();
        let deadline = self.policy.deadline.map(|d| started + d);
        let members: Vec<Credential> = groups.iter().flat_map(|g| g.members.iter().cloned()).collect();

        let mut report = WalkReport {
            members: members.len(),
            ..WalkReport::default()
        };

        // `buffered` keeps member order, so merge order does not depend on timing
        let mut outcomes = stream::iter(members)
            .map(move |member| self.walk_member(member, deadline))
            .buffered(self.policy.concurrency.max(1));

        while let Some(units) = outcomes.next().await {
            for unit in units {
                report.absorb(unit);
            }
        }

        tracing::info!(
            members = report.members,
            repositories = report.repositories,
            commits = report.commits,
            authors = report.digest.len(),
            failures = report.failures.len(),
            elapsed = ?started.elapsed(),
            "contributor walk complete"
        );

        report
    }

    async fn walk_member(&self, member: Credential, deadline: Option<Instant>) -> Vec<UnitResult> {
        let expired = || deadline.is_some_and(|d| Instant::now() >= d);
        let out_of_time = || WalkFailure::DeadlineExceeded {
            workspace: member.workspace.clone(),
        };

        if expired() {
            return vec![Err(out_of_time())];
        }

        let repositories = match self.source.repositories(&member).await {
            Ok(repositories) => repositories,
            Err(e) => {
                return vec![Err(WalkFailure::Repositories {
                    workspace: member.workspace.clone(),
                    reason: e.to_string(),
                })];
            }
        };

        tracing::debug!(
            member = %member.member_name,
            workspace = %member.workspace,
            repositories = repositories.len(),
            "walking member"
        );

        let mut units = Vec::with_capacity(repositories.len());
        for repository in repositories {
            if expired() {
                units.push(Err(out_of_time()));
                break;
            }

            let unit = match self.source.commits(&member, &repository.slug).await {
                Ok(commits) => {
                    if let Some(latest) = commits.first() {
                        tracing::debug!(
                            repository = %repository.slug,
                            commits = commits.len(),
                            "latest by {}",
                            display_name(&latest.author)
                        );
                    }
                    Ok(RepositoryCommits {
                        workspace: member.workspace.clone(),
                        repository,
                        commits,
                    })
                }
                Err(e) => Err(WalkFailure::Commits {
                    workspace: member.workspace.clone(),
                    repository: repository.slug,
                    reason: e.to_string(),
                }),
            };
            units.push(unit);
        }
        units
    }
}
