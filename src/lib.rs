//! Post index filtering, search and card rendering for static blog listing
//! pages.
//!
//! The crate loads one precomputed post index and drives the interactive
//! surfaces of the site against it: the tiled and grouped category pages, the
//! tag cloud, free-text search and the related-posts widget. Pages are
//! modelled as a set of mount points holding abstract node trees, so the same
//! controllers can back a browser binding or the bundled CLI.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
