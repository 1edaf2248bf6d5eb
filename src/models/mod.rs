//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for the dashboard frontend.
//! - `commit`: Commit as exposed by the commit-list endpoints
//! - `repository`: RepositoryDescriptor for the workspace project listing
//! - `contribution`: ContributionSummary, AuthorStats, TimelineEntry
//! - `digest`: DigestEntry and DigestCommit for the cross-workspace digest
//! - `group`: GroupSummary for the group overview (tokens stripped)

pub mod commit;
pub mod contribution;
pub mod digest;
pub mod group;
pub mod repository;

pub use commit::*;
pub use contribution::*;
pub use digest::*;
pub use group::*;
pub use repository::*;
