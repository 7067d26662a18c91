//! MCP resources for the tool directory

pub mod category;
pub mod tool_info;
