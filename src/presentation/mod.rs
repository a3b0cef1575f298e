//! Rendering surfaces: node trees, post cards and page mount points.

pub mod card;
pub mod document;
pub mod node;
