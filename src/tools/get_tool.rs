//! Get tool detail tool

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, Tool, ToolBuilder, ToolError,
    extract::{Json, State},
};

use crate::catalog::ToolRecord;
use crate::search::Counts;
use crate::state::{AppState, format_number};

/// Input for getting a tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetToolInput {
    /// Tool id (e.g. "autopilot-reset")
    id: String,
}

/// Markdown detail page for one tool.
pub(crate) fn render_detail(r: &ToolRecord, counts: &Counts) -> String {
    let mut output = format!("# {}\n\n", r.name);

    if !r.description.is_empty() {
        output.push_str(&format!("{}\n\n", r.description.trim()));
    }

    output.push_str(&format!("- **Id:** `{}`\n", r.id));
    output.push_str(&format!("- **Category:** {}\n", r.category.label()));
    output.push_str(&format!("- **Type:** {}\n", r.tool_type.label()));
    if let Some(date) = r.date_added {
        output.push_str(&format!("- **Added:** {}\n", date.date_naive()));
    }
    output.push_str(&format!(
        "- **Views:** {}\n- **Votes:** {}\n",
        format_number(counts.views(&r.id)),
        format_number(counts.votes(&r.id))
    ));
    if let Some(stats) = r.repo_stats {
        output.push_str(&format!(
            "- **Stars:** {} | **Forks:** {}\n",
            format_number(stats.stars),
            format_number(stats.forks)
        ));
    }
    if !r.keywords.is_empty() {
        output.push_str(&format!("- **Keywords:** {}\n", r.keywords.join(", ")));
    }
    if !r.works_with.is_empty() {
        output.push_str(&format!("- **Works with:** {}\n", r.works_with.join(", ")));
    }

    output.push_str("\n## Authors\n\n");
    for author in r.authors() {
        let links: Vec<String> = [
            ("GitHub", author.github.as_deref()),
            ("Twitter", author.twitter.as_deref()),
            ("LinkedIn", author.linkedin.as_deref()),
            ("Website", author.website.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|u| format!("[{label}]({u})")))
        .collect();
        if links.is_empty() {
            output.push_str(&format!("- {}\n", author.name));
        } else {
            output.push_str(&format!("- {} ({})\n", author.name, links.join(", ")));
        }
    }

    let links: Vec<String> = [
        ("Repository", r.github_url.as_deref()),
        ("Website", r.website_url.as_deref()),
        ("Documentation", r.documentation_url.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| url.map(|u| format!("**{label}:** {u}")))
    .collect();
    if !links.is_empty() {
        output.push_str("\n## Links\n\n");
        for link in links {
            output.push_str(&format!("{}\n", link));
        }
    }

    let screenshots = r.display_screenshots();
    if !screenshots.is_empty() {
        output.push_str("\n## Screenshots\n\n");
        for (i, shot) in screenshots.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, shot));
        }
    }

    output
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("get_tool")
        .description(
            "Get full details for a tool by id: description, category, type, \
             authors with their links, view and vote counts, repository stats, \
             and screenshots.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<GetToolInput>| async move {
                let record = state
                    .store
                    .get(input.id.trim())
                    .ok_or_else(|| ToolError::new(format!("Tool '{}' not found", input.id)))?;
                let counts = state
                    .counts
                    .current(&state.client, state.config.counts_max_age)
                    .await;

                Ok(CallToolResult::text(render_detail(record, &counts)))
            },
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolStore;
    use crate::client::CountMap;

    #[test]
    fn detail_lists_authors_links_and_capped_screenshots() {
        let store = ToolStore::from_json_str(
            r#"[{
                "id": "intune-docs", "name": "Intune Docs", "category": "documentation",
                "type": "web-app", "dateAdded": "2024-03-05",
                "authors": [{"name": "Sam", "github": "https://github.com/sam"}, {"name": "Lee"}],
                "repoStats": {"stars": 1500, "forks": 12},
                "githubUrl": "https://github.com/sam/intune-docs",
                "screenshots": ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png"]
            }]"#,
        )
        .unwrap();
        let counts = Counts::new(
            CountMap::from([("intune-docs".into(), 42)]),
            CountMap::from([("intune-docs".into(), 7)]),
        );

        let text = render_detail(store.get("intune-docs").unwrap(), &counts);
        assert!(text.starts_with("# Intune Docs"));
        assert!(text.contains("- **Added:** 2024-03-05"));
        assert!(text.contains("- **Views:** 42"));
        assert!(text.contains("- **Votes:** 7"));
        assert!(text.contains("**Stars:** 1.5K"));
        assert!(text.contains("- Sam ([GitHub](https://github.com/sam))"));
        assert!(text.contains("- Lee\n"));
        assert!(text.contains("**Repository:** https://github.com/sam/intune-docs"));
        assert!(text.contains("5. 5.png"));
        assert!(!text.contains("6.png"));
    }
}
