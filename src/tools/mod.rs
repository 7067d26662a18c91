//! Tool definitions for the directory
//!
//! Each tool wraps one search, catalog, or counter operation.

pub mod categories;
pub mod get_tool;
pub mod popular;
pub mod related;
pub mod search;
pub mod view;
pub mod vote;
