//! One controller per page template.
//!
//! Each controller owns its predicate state and only touches the mount points
//! it was built from.

pub mod category;
pub mod related;
pub mod search;
pub mod tags;

pub(crate) const LOAD_FAILED_POSTS: &str = "Failed to load posts.";
pub(crate) const LOAD_FAILED_TAGS: &str = "Failed to load tags.";
