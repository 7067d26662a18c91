//! Resource template for category listings
//!
//! Lists every tool in one category via URI template: tools://category/{category}

use std::collections::HashMap;
use std::sync::Arc;

use tower_mcp::protocol::{ReadResourceResult, ResourceContent};
use tower_mcp::resource::{ResourceTemplate, ResourceTemplateBuilder};

use crate::catalog::Category;
use crate::search::{Counts, FilterState, keyword_filter, sort_records};
use crate::state::AppState;

pub fn build(state: Arc<AppState>) -> ResourceTemplate {
    ResourceTemplateBuilder::new("tools://category/{category}")
        .name("Category Listing")
        .description("List every tool in a category, alphabetically")
        .mime_type("text/markdown")
        .handler(move |uri: String, vars: HashMap<String, String>| {
            let state = state.clone();
            async move {
                let slug = vars.get("category").cloned().unwrap_or_default();
                let filters = FilterState {
                    category: Some(Category::from(slug.as_str())),
                    ..Default::default()
                };

                let mut records = keyword_filter(state.store.all(), &filters.criteria());
                if records.is_empty() {
                    return Err(tower_mcp::Error::tool(format!(
                        "No tools in category '{}'",
                        slug
                    )));
                }
                sort_records(&mut records, filters.sort, &Counts::default());

                let mut content = format!(
                    "# {} ({} tools)\n\n",
                    Category::from(slug.as_str()).label(),
                    records.len()
                );
                for r in &records {
                    content.push_str(&format!(
                        "- **{}** (`{}`): {}\n",
                        r.name,
                        r.id,
                        r.description.trim()
                    ));
                }

                Ok(ReadResourceResult {
                    contents: vec![ResourceContent {
                        uri,
                        mime_type: Some("text/markdown".to_string()),
                        text: Some(content),
                        blob: None,
                        meta: None,
                    }],
                    meta: None,
                })
            }
        })
}
