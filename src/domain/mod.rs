//! Domain layer types and invariants.

pub mod badges;
pub mod catalog;
pub mod posts;
