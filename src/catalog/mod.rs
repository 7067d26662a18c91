//! Tool dataset: record types, normalization, and the read-only store.

pub mod error;
pub mod related;
pub mod store;
pub mod types;

pub use error::CatalogError;
pub use related::{RelatedTool, related_tools};
pub use store::ToolStore;
pub use types::*;
