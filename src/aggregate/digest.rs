use std::collections::HashMap;

use crate::models::{DigestCommit, DigestEntry};

/// How many commits each author keeps in the digest.
pub const MAX_RECENT_COMMITS: usize = 3;

/// Per-author "most recent commits" across every repository merged so far.
///
/// Authors keep first-seen order. An author's list is only the true global
/// top three once every repository has been merged.
#[derive(Debug, Default, Clone)]
pub struct ContributorDigest {
    entries: Vec<DigestEntry>,
    index: HashMap<String, usize>,
}

impl ContributorDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one commit for `author`, keeping that author's list sorted newest
    /// first and capped at `MAX_RECENT_COMMITS`. Older commits from other
    /// repositories may be evicted.
    pub fn merge_commit(&mut self, author: &str, commit: DigestCommit) {
        let slot = match self.index.get(author) {
            Some(&slot) => slot,
            None => {
                self.entries.push(DigestEntry {
                    author: author.to_string(),
                    commits: Vec::with_capacity(MAX_RECENT_COMMITS + 1),
                });
                let slot = self.entries.len() - 1;
                self.index.insert(author.to_string(), slot);
                slot
            }
        };

        let commits = &mut self.entries[slot].commits;
        if commits.iter().any(|c| c.same_origin(&commit)) {
            return;
        }
        commits.push(commit);
        commits.sort_by(|a, b| b.date.cmp(&a.date));
        commits.truncate(MAX_RECENT_COMMITS);
    }

    pub fn get(&self, author: &str) -> Option<&DigestEntry> {
        self.index.get(author).map(|&slot| &self.entries[slot])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DigestEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DigestEntry> {
        self.entries
    }
}
