use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::Url;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_mcp::protocol::{
    CallToolParams, CompleteParams, CompleteResult, Completion, CompletionReference, McpRequest,
};
use tower_mcp::router::{RouterRequest, RouterResponse};
use tower_mcp::{HttpTransport, McpRouter, McpTracingLayer, StdioTransport};
use tower_resilience::bulkhead::BulkheadLayer;
use tower_resilience::cache::SharedCacheLayer;
use tower_resilience::ratelimiter::RateLimiterLayer;

use toolshed_mcp::catalog::{Category, ToolStore};
use toolshed_mcp::config::{self, SearchConfig};
use toolshed_mcp::state::{AppState, DEFAULT_SITE_URL};
use toolshed_mcp::{resources, tools};

/// Tool calls that change counters and must never be served from cache.
const UNCACHED_TOOLS: [&str; 2] = ["vote_tool", "record_view"];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Parser, Debug)]
#[command(name = "toolshed-mcp")]
#[command(about = "MCP server for searching a curated tool directory", long_about = None)]
struct Args {
    /// Tool dataset: a JSON array file, or a directory of one-tool JSON files
    #[arg(short, long, env = "TOOLSHED_DATA")]
    data: PathBuf,

    /// Base URL of the site API (AI search, counters, analytics)
    #[arg(long, env = "TOOLSHED_API_BASE_URL")]
    api_base_url: String,

    /// Bearer token for the site API
    #[arg(long, env = "TOOLSHED_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Public site URL used as the base of shareable filter links
    #[arg(long, env = "TOOLSHED_SITE_URL", default_value = DEFAULT_SITE_URL)]
    site_url: String,

    /// Minimum query length (characters) that switches to AI search
    #[arg(long, default_value_t = config::DEFAULT_AI_THRESHOLD)]
    ai_threshold: usize,

    /// Timeout for site API requests, including AI search (in seconds)
    #[arg(long, default_value_t = config::DEFAULT_AI_TIMEOUT.as_secs())]
    ai_timeout_secs: u64,

    /// Tools per page for search results
    #[arg(long, default_value_t = config::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// How long view/vote counts are reused before refetching (in seconds)
    #[arg(long, default_value_t = config::DEFAULT_COUNTS_MAX_AGE.as_secs())]
    counts_max_age_secs: u64,

    /// Transport to use
    #[arg(short, long, default_value = "stdio")]
    transport: Transport,

    /// Maximum concurrent requests (concurrency limit)
    #[arg(long, default_value = "10")]
    max_concurrent: usize,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// HTTP host to bind to (use 0.0.0.0 for public access)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// HTTP port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Request timeout in seconds (for HTTP transport)
    #[arg(long, default_value = "30")]
    request_timeout_secs: u64,

    /// Minimal mode - only register tools (no resources or completions)
    #[arg(long, default_value = "false")]
    minimal: bool,

    /// Enable response caching for tool calls (HTTP transport only)
    #[arg(long, default_value = "true")]
    cache_enabled: bool,

    /// Cache TTL in seconds (how long cached responses are valid)
    #[arg(long, default_value = "60")]
    cache_ttl_secs: u64,

    /// Maximum number of cached responses
    #[arg(long, default_value = "200")]
    cache_max_size: usize,
}

#[tokio::main]
async fn main() -> Result<(), tower_mcp::BoxError> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("toolshed_mcp={}", args.log_level).parse()?)
                .add_directive(format!("tower_mcp={}", args.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        transport = ?args.transport,
        max_concurrent = args.max_concurrent,
        data = %args.data.display(),
        api_base_url = %args.api_base_url,
        "Starting toolshed-mcp server"
    );

    let store = ToolStore::load(&args.data)
        .map_err(|e| format!("Failed to load tool dataset: {}", e))?;
    let site_url = Url::parse(&args.site_url)
        .map_err(|e| format!("Invalid site URL '{}': {}", args.site_url, e))?;
    let search_config = SearchConfig {
        ai_threshold: args.ai_threshold,
        ai_timeout: Duration::from_secs(args.ai_timeout_secs),
        page_size: args.page_size,
        counts_max_age: Duration::from_secs(args.counts_max_age_secs),
        ..SearchConfig::default()
    };
    let state = Arc::new(
        AppState::new(
            store,
            &args.api_base_url,
            args.api_key.clone(),
            search_config,
            site_url,
        )
        .map_err(|e| format!("Failed to create state: {}", e))?,
    );

    // Build all tools
    let search_tool = tools::search::build(state.clone());
    let get_tool = tools::get_tool::build(state.clone());
    let categories_tool = tools::categories::build(state.clone());
    let types_tool = tools::categories::build_types(state.clone());
    let popular_tool = tools::popular::build(state.clone());
    let related_tool = tools::related::build(state.clone());
    let vote_tool = tools::vote::build(state.clone());
    let view_tool = tools::view::build(state.clone());

    let tool_list = "Available tools:\n\
         - search_tools: Keyword or AI-ranked search with category/type filters, sorting, and paging\n\
         - get_tool: Full details for a tool\n\
         - list_categories: Categories with tool counts\n\
         - list_types: Tool types with tool counts\n\
         - popular_tools: Most-starred tools\n\
         - related_tools: Tools sharing keywords, integrations, category, or type\n\
         - vote_tool: Upvote a tool (once per voter)\n\
         - record_view: Count a view of a tool's detail page";
    let instructions = if args.minimal {
        format!(
            "MCP server for a curated directory of IT-management tools.\n\n{}\n\n\
             (Running in minimal mode - resources and completions disabled)",
            tool_list
        )
    } else {
        format!(
            "MCP server for a curated directory of IT-management tools.\n\n{}\n\n\
             Resources:\n\
             - tools://tool/{{id}}: Tool detail page\n\
             - tools://category/{{category}}: Every tool in a category",
            tool_list
        )
    };

    let mut router = McpRouter::new()
        .server_info("toolshed-mcp", env!("CARGO_PKG_VERSION"))
        .instructions(&instructions)
        .tool(search_tool)
        .tool(get_tool)
        .tool(categories_tool)
        .tool(types_tool)
        .tool(popular_tool)
        .tool(related_tool)
        .tool(vote_tool)
        .tool(view_tool);

    // Add resources and completions unless in minimal mode
    if !args.minimal {
        let tool_template = resources::tool_info::build(state.clone());
        let category_template = resources::category::build(state.clone());
        let completion_state = state.clone();

        router = router
            .resource_template(tool_template)
            .resource_template(category_template)
            // Completion handler for tool ids and category slugs
            .completion_handler(move |params: CompleteParams| {
                let state = completion_state.clone();
                async move {
                    let prefix = params.argument.value.to_lowercase();

                    let suggestions: Vec<String> = match &params.reference {
                        CompletionReference::Resource { uri } if uri.contains("category") => {
                            tracing::debug!(%uri, %prefix, "Completing category slug");
                            Category::ALL
                                .iter()
                                .map(|c| c.as_str().to_string())
                                .filter(|slug| slug.starts_with(&prefix))
                                .collect()
                        }
                        CompletionReference::Resource { uri } => {
                            tracing::debug!(%uri, %prefix, "Completing tool id");
                            state.store.ids_with_prefix(&prefix, 10)
                        }
                        CompletionReference::Prompt { name } => {
                            tracing::debug!(%name, %prefix, "Completing prompt argument");
                            Vec::new()
                        }
                        _ => Vec::new(),
                    };

                    Ok(CompleteResult {
                        completion: Completion {
                            values: suggestions,
                            total: None,
                            has_more: Some(false),
                        },
                        meta: None,
                    })
                }
            });

        tracing::info!("Full mode: resources and completions enabled");
    } else {
        tracing::info!("Minimal mode: only tools registered");
    }

    let router = router;

    match args.transport {
        Transport::Stdio => {
            tracing::info!("Serving over stdio");
            StdioTransport::new(router).run().await?;
        }
        Transport::Http => {
            let addr = format!("{}:{}", args.host, args.port);
            tracing::info!(
                %addr,
                cache_enabled = args.cache_enabled,
                cache_ttl_secs = args.cache_ttl_secs,
                cache_max_size = args.cache_max_size,
                "Serving over HTTP"
            );

            // Middleware, outermost first: timeout, rate limit, bulkhead,
            // then the optional shared response cache.
            let rate_limiter = RateLimiterLayer::builder()
                .limit_for_period(10) // 10 requests per second
                .refresh_period(Duration::from_secs(1))
                .timeout_duration(Duration::from_millis(500))
                .build();

            let bulkhead = BulkheadLayer::builder()
                .max_concurrent_calls(args.max_concurrent)
                .max_wait_duration(Duration::from_millis(500))
                .build();

            // Only read-only tool calls get a stable key. Counter writes and
            // every other MCP method get a per-request key that never matches.
            let cache: SharedCacheLayer<RouterRequest, String, RouterResponse> =
                SharedCacheLayer::builder()
                    .max_size(args.cache_max_size)
                    .ttl(Duration::from_secs(args.cache_ttl_secs))
                    .key_extractor(|req: &RouterRequest| -> String {
                        match &req.inner {
                            McpRequest::CallTool(CallToolParams {
                                name, arguments, ..
                            }) if !UNCACHED_TOOLS.contains(&name.as_str()) => {
                                let args_str = serde_json::to_string(arguments).unwrap_or_default();
                                format!("tool:{}:{}", name, args_str)
                            }
                            _ => format!("nocache:{:?}", req.id),
                        }
                    })
                    .on_hit(|| tracing::debug!("Cache hit"))
                    .on_miss(|| tracing::debug!("Cache miss"))
                    .build();

            let builder = ServiceBuilder::new()
                .layer(TimeoutLayer::new(Duration::from_secs(
                    args.request_timeout_secs,
                )))
                .layer(rate_limiter)
                .layer(bulkhead);

            let transport = if args.cache_enabled {
                HttpTransport::new(router)
                    .disable_origin_validation()
                    .layer(
                        builder
                            .layer(cache)
                            .layer(McpTracingLayer::new())
                            .into_inner(),
                    )
            } else {
                HttpTransport::new(router)
                    .disable_origin_validation()
                    .layer(builder.layer(McpTracingLayer::new()).into_inner())
            };

            transport.serve(&addr).await?;
        }
    }

    Ok(())
}
