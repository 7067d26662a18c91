//! MCP integration tests using tower-mcp's TestClient + wiremock.
//!
//! These tests exercise the full JSON-RPC pipeline: client request -> router ->
//! tool/resource handler -> wiremock site API mock -> formatted response.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use toolshed_mcp::catalog::ToolStore;
use toolshed_mcp::state::AppState;
use toolshed_mcp::{resources, tools};
use tower_mcp::{McpRouter, TestClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Dataset ────────────────────────────────────────────────────────────────

const TOOLS_JSON: &str = r#"[
    {
        "id": "autopilot-reset",
        "name": "Autopilot Reset Tool",
        "description": "Remotely reset Autopilot devices in bulk",
        "category": "automation",
        "type": "script",
        "author": "Jo Admin",
        "authorGithub": "https://github.com/joadmin",
        "dateAdded": "2024-02-01",
        "keywords": ["autopilot", "reset"],
        "worksWith": ["intune"],
        "repoStats": {"stars": 320, "forks": 41}
    },
    {
        "id": "compliance-report",
        "name": "Compliance Report",
        "description": "Device compliance dashboards",
        "category": "reporting",
        "type": "web-app",
        "authors": [{"name": "Sam"}, {"name": "Lee"}],
        "dateAdded": "2024-06-12T08:00:00Z",
        "keywords": ["compliance"],
        "worksWith": ["intune"],
        "repoStats": {"stars": 1200, "forks": 80}
    },
    {
        "id": "autopilot-export",
        "name": "Autopilot Profile Export",
        "description": "Export deployment profiles to JSON",
        "category": "reporting",
        "type": "script",
        "keywords": ["autopilot", "export"],
        "worksWith": ["intune"]
    },
    {
        "id": "bitlocker-keys",
        "name": "BitLocker Key Audit",
        "description": "Find devices without escrowed recovery keys",
        "category": "security",
        "type": "cli-tool",
        "author": {"name": "Riley", "website": "https://riley.dev"}
    }
]"#;

const AI_QUERY: &str = "how do I reset autopilot devices remotely";

// ── Helpers ────────────────────────────────────────────────────────────────

fn test_state(server: &MockServer) -> Arc<AppState> {
    let store = ToolStore::from_json_str(TOOLS_JSON).expect("dataset parses");
    Arc::new(AppState::with_base_url(store, &server.uri()).expect("failed to create test state"))
}

fn test_router(state: Arc<AppState>) -> McpRouter {
    McpRouter::new()
        .server_info("toolshed-mcp", "0.1.0")
        .tool(tools::search::build(state.clone()))
        .tool(tools::get_tool::build(state.clone()))
        .tool(tools::categories::build(state.clone()))
        .tool(tools::categories::build_types(state.clone()))
        .tool(tools::popular::build(state.clone()))
        .tool(tools::related::build(state.clone()))
        .tool(tools::vote::build(state.clone()))
        .tool(tools::view::build(state.clone()))
        .resource_template(resources::tool_info::build(state.clone()))
        .resource_template(resources::category::build(state.clone()))
}

async fn initialized_client(server: &MockServer) -> TestClient {
    let state = test_state(server);
    let router = test_router(state);
    let mut client = TestClient::from_router(router);
    client.initialize().await;
    client
}

/// Mount GET /views and GET /votes.
async fn mount_counts(server: &MockServer, views: serde_json::Value, votes: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/views"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "counts": views })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/votes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "counts": votes })))
        .mount(server)
        .await;
}

async fn mount_analytics(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// Position of each needle in `text`, panicking if one is missing.
fn positions(text: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| text.find(n).unwrap_or_else(|| panic!("missing {n:?} in:\n{text}")))
        .collect()
}

// ── Discovery tests ────────────────────────────────────────────────────────

#[tokio::test]
async fn list_tools_returns_all_8() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let tools = client.list_tools().await;

    assert_eq!(tools.len(), 8);
    let names: Vec<&str> = tools
        .iter()
        .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
        .collect();
    for expected in [
        "search_tools",
        "get_tool",
        "list_categories",
        "list_types",
        "popular_tools",
        "related_tools",
        "vote_tool",
        "record_view",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn list_resource_templates_returns_both() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.send_request("resources/templates/list", None).await;
    let templates = result
        .get("resourceTemplates")
        .and_then(|v| v.as_array())
        .expect("expected resourceTemplates array");

    assert_eq!(templates.len(), 2);
    let uris: Vec<&str> = templates
        .iter()
        .filter_map(|t| t.get("uriTemplate").and_then(|u| u.as_str()))
        .collect();
    assert!(uris.contains(&"tools://tool/{id}"));
    assert!(uris.contains(&"tools://category/{category}"));
}

// ── search_tools ───────────────────────────────────────────────────────────

#[tokio::test]
async fn keyword_search_filters_and_sorts_alphabetically() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"query": "autopilot"}))
        .await;

    assert!(!result.is_error);
    let text = result.all_text();
    assert!(text.contains("Found 2 tools, page 1 of 1 (sorted by A-Z)"));
    let pos = positions(&text, &["Autopilot Profile Export", "Autopilot Reset Tool"]);
    assert!(pos[0] < pos[1]);
    assert!(!text.contains("Confidence"));
    assert!(text.contains("**Share:** https://tools.example.com/?q=autopilot"));
}

#[tokio::test]
async fn keyword_search_matches_author_names() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;

    let mut client = initialized_client(&server).await;
    let result = client.call_tool("search_tools", json!({"query": "riley"})).await;

    let text = result.all_text();
    assert!(text.contains("BitLocker Key Audit"));
    assert!(text.contains("Found 1 tools"));
}

#[tokio::test]
async fn category_and_type_filters_combine() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool(
            "search_tools",
            json!({"category": "reporting", "type": "web-app", "sort": "newest"}),
        )
        .await;

    let text = result.all_text();
    assert!(text.contains("Compliance Report"));
    assert!(!text.contains("Autopilot Profile Export"));
    assert!(text.contains("category=reporting&type=web-app&sort=newest"));
}

#[tokio::test]
async fn popular_sort_uses_view_counts() {
    let server = MockServer::start().await;
    mount_counts(
        &server,
        json!({"bitlocker-keys": 90, "autopilot-export": 12}),
        json!({}),
    )
    .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"sort": "popular"}))
        .await;

    let text = result.all_text();
    let pos = positions(
        &text,
        &[
            "BitLocker Key Audit",
            "Autopilot Profile Export",
            "Autopilot Reset Tool",
            "Compliance Report",
        ],
    );
    assert!(pos.windows(2).all(|w| w[0] < w[1]));
    assert!(text.contains("**Views:** 90"));
}

#[tokio::test]
async fn paging_clamps_to_last_page() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"per_page": 3, "page": 9}))
        .await;

    let text = result.all_text();
    assert!(text.contains("Found 4 tools, page 2 of 2"));
    assert!(text.contains("## 4. Compliance Report"));
    assert!(!text.contains("More results"));
}

#[tokio::test]
async fn ai_search_ranks_by_confidence_and_logs_once() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .and(body_json(json!({"query": AI_QUERY})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"toolId": "autopilot-export", "confidence": 61, "relevance": "Related profiles"},
                {"toolId": "ghost-tool", "confidence": 99, "relevance": "Unknown id"},
                {"toolId": "autopilot-reset", "confidence": 92, "relevance": "Resets devices"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .and(body_json(json!({
            "event": "search",
            "query": AI_QUERY,
            "mode": "ai",
            "results": 2
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"query": AI_QUERY}))
        .await;

    assert!(!result.is_error);
    let text = result.all_text();
    assert!(text.contains("(sorted by AI relevance)"));
    assert!(text.contains("**Confidence:** 92% (Resets devices)"));
    assert!(!text.contains("Unknown id"));
    let pos = positions(&text, &["Autopilot Reset Tool", "Autopilot Profile Export"]);
    assert!(pos[0] < pos[1]);

    // Same query again: answered, but not reported twice.
    client
        .call_tool("search_tools", json!({"query": AI_QUERY}))
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn ai_search_respects_category_filter() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;
    mount_analytics(&server).await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"toolId": "autopilot-reset", "confidence": 92},
                {"toolId": "autopilot-export", "confidence": 61}
            ]
        })))
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool(
            "search_tools",
            json!({"query": AI_QUERY, "category": "reporting"}),
        )
        .await;

    let text = result.all_text();
    assert!(text.contains("Autopilot Profile Export"));
    assert!(!text.contains("Autopilot Reset Tool"));
}

#[tokio::test]
async fn ai_failure_degrades_to_unavailable_message() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"toolId": "x", "confidence": 250}]
        })))
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"query": AI_QUERY}))
        .await;

    assert!(!result.is_error);
    let text = result.all_text();
    assert!(text.contains("AI search is unavailable right now"));
    assert!(!text.contains("No tools match"));
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn ai_query_is_reported_once_it_succeeds() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .and(body_json(json!({
            "event": "search",
            "query": AI_QUERY,
            "mode": "ai",
            "results": 1
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"toolId": "autopilot-reset", "confidence": 92}]
        })))
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let failed = client
        .call_tool("search_tools", json!({"query": AI_QUERY}))
        .await;
    assert!(failed.all_text().contains("AI search is unavailable right now"));

    let answered = client
        .call_tool("search_tools", json!({"query": AI_QUERY}))
        .await;
    assert!(answered.all_text().contains("Autopilot Reset Tool"));
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn no_results_is_its_own_message() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("search_tools", json!({"query": "zzz"}))
        .await;

    assert!(!result.is_error);
    assert!(result.all_text().contains("No tools match these filters."));
}

#[tokio::test]
async fn invalid_share_url_is_an_error() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client
        .call_tool("search_tools", json!({"share_url": "not a url"}))
        .await;

    assert!(result.is_error);
}

// ── Catalog tools ──────────────────────────────────────────────────────────

#[tokio::test]
async fn tool_get_tool() {
    let server = MockServer::start().await;
    mount_counts(
        &server,
        json!({"autopilot-reset": 1500}),
        json!({"autopilot-reset": 12}),
    )
    .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("get_tool", json!({"id": "autopilot-reset"}))
        .await;

    assert!(!result.is_error);
    let text = result.all_text();
    assert!(text.contains("# Autopilot Reset Tool"));
    assert!(text.contains("- Jo Admin ([GitHub](https://github.com/joadmin))"));
    assert!(text.contains("- **Views:** 1.5K"));
    assert!(text.contains("- **Votes:** 12"));
    assert!(text.contains("- **Added:** 2024-02-01"));
}

#[tokio::test]
async fn tool_get_tool_not_found() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.call_tool("get_tool", json!({"id": "nope"})).await;

    assert!(result.is_error);
}

#[tokio::test]
async fn tool_list_categories() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.call_tool("list_categories", json!({})).await;

    let text = result.all_text();
    assert!(text.contains("# Categories (4 tools)"));
    assert!(text.contains("- **Reporting** (`reporting`): 2 tools"));
    assert!(text.contains("- **Migration** (`migration`): 0 tools"));
}

#[tokio::test]
async fn tool_list_types() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.call_tool("list_types", json!({})).await;

    let text = result.all_text();
    assert!(text.contains("(`script`): 2 tools"));
    assert!(text.contains("(`cli-tool`): 1 tools"));
}

#[tokio::test]
async fn tool_popular_tools() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.call_tool("popular_tools", json!({"limit": 5})).await;

    let text = result.all_text();
    assert!(text.contains("# Popular tools (top 2)"));
    assert!(text.contains("1. **Compliance Report** (`compliance-report`): 1.2K stars, 80 forks"));
    assert!(text.contains("2. **Autopilot Reset Tool**"));
}

#[tokio::test]
async fn tool_related_tools() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client
        .call_tool("related_tools", json!({"id": "autopilot-reset"}))
        .await;

    let text = result.all_text();
    // Shares a keyword, an integration, and the type: 3 + 2 + 1.
    assert!(text.contains("**Autopilot Profile Export** (`autopilot-export`): Reporting, Script (score 6)"));
    assert!(!text.contains("BitLocker"));
    let pos = positions(&text, &["Autopilot Profile Export", "Compliance Report"]);
    assert!(pos[0] < pos[1]);
}

// ── Counter tools ──────────────────────────────────────────────────────────

#[tokio::test]
async fn tool_vote_is_counted_once_per_voter() {
    let server = MockServer::start().await;
    mount_analytics(&server).await;
    Mock::given(method("POST"))
        .and(path("/votes/compliance-report"))
        .and(body_json(json!({"voterId": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"votes": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let first = client
        .call_tool(
            "vote_tool",
            json!({"id": "compliance-report", "voter": "alice"}),
        )
        .await;
    assert!(!first.is_error);
    assert!(first.all_text().contains("Vote recorded for **Compliance Report**. Votes: 5"));

    let second = client
        .call_tool(
            "vote_tool",
            json!({"id": "compliance-report", "voter": "alice"}),
        )
        .await;
    assert!(!second.is_error);
    assert!(second.all_text().contains("Already voted for **Compliance Report**. Votes: 5"));
}

#[tokio::test]
async fn tool_vote_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/votes/compliance-report"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool(
            "vote_tool",
            json!({"id": "compliance-report", "voter": "alice"}),
        )
        .await;

    assert!(result.is_error);
}

#[tokio::test]
async fn tool_record_view() {
    let server = MockServer::start().await;
    mount_analytics(&server).await;
    Mock::given(method("POST"))
        .and(path("/views/bitlocker-keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"views": 77})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = initialized_client(&server).await;
    let result = client
        .call_tool("record_view", json!({"id": "bitlocker-keys"}))
        .await;

    assert!(!result.is_error);
    assert!(result.all_text().contains("Views: 77"));
}

// ── Resource tests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn resource_template_tool_info() {
    let server = MockServer::start().await;
    mount_counts(&server, json!({}), json!({})).await;

    let mut client = initialized_client(&server).await;
    let result = client.read_resource("tools://tool/bitlocker-keys").await;

    let text = result.first_text().expect("expected text content");
    assert!(text.contains("# BitLocker Key Audit"));
    assert!(text.contains("- Riley ([Website](https://riley.dev))"));
}

#[tokio::test]
async fn resource_template_category() {
    let server = MockServer::start().await;
    let mut client = initialized_client(&server).await;

    let result = client.read_resource("tools://category/reporting").await;

    let text = result.first_text().expect("expected text content");
    assert!(text.contains("# Reporting (2 tools)"));
    let pos = positions(&text, &["Autopilot Profile Export", "Compliance Report"]);
    assert!(pos[0] < pos[1]);
}
