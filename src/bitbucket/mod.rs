//! Client side of the upstream REST API.
//!
//! - `client`: authenticated GET with default page size and upstream error mapping
//! - `models`: wire types for repository and commit listings
//! - `source`: cached `CommitSource` used by the contributor walk

pub mod client;
pub mod models;
pub mod source;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use source::CachedSource;
