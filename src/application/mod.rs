//! Page runtime and the controllers driving it.

pub mod controllers;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod location;
pub mod page;
pub mod store;
