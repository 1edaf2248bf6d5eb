//! Contribution aggregation.
//!
//! - `contributions`: one repository's commits → window counts, author stats, timeline
//! - `digest`: per-author top-3 recent commits merged across repositories
//! - `walker`: sequential group → member → repository walk feeding the digest

pub mod contributions;
pub mod digest;
pub mod walker;

pub use contributions::aggregate;
pub use walker::{CommitSource, FanOutWalker, WalkPolicy};
