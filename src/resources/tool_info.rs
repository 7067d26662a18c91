//! Resource template for tool details
//!
//! Exposes a tool's detail page via URI template: tools://tool/{id}

use std::collections::HashMap;
use std::sync::Arc;

use tower_mcp::protocol::{ReadResourceResult, ResourceContent};
use tower_mcp::resource::{ResourceTemplate, ResourceTemplateBuilder};

use crate::state::AppState;
use crate::tools::get_tool::render_detail;

pub fn build(state: Arc<AppState>) -> ResourceTemplate {
    ResourceTemplateBuilder::new("tools://tool/{id}")
        .name("Tool Details")
        .description("Get the detail page of a directory tool by id")
        .mime_type("text/markdown")
        .handler(move |uri: String, vars: HashMap<String, String>| {
            let state = state.clone();
            async move {
                let id = vars.get("id").cloned().unwrap_or_default();

                let record = state
                    .store
                    .get(&id)
                    .ok_or_else(|| tower_mcp::Error::tool(format!("Tool '{}' not found", id)))?;
                let counts = state
                    .counts
                    .current(&state.client, state.config.counts_max_age)
                    .await;

                Ok(ReadResourceResult {
                    contents: vec![ResourceContent {
                        uri,
                        mime_type: Some("text/markdown".to_string()),
                        text: Some(render_detail(record, &counts)),
                        blob: None,
                        meta: None,
                    }],
                    meta: None,
                })
            }
        })
}
