//! Tool directory search: a curated tool catalog with hybrid keyword / AI
//! search, counters, and an MCP server surface.

pub mod catalog;
pub mod client;
pub mod config;
pub mod resources;
pub mod search;
pub mod state;
pub mod tools;
