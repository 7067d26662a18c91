//! Public data types for the tool directory.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of screenshots shown for a single tool.
pub const MAX_SCREENSHOTS: usize = 5;

// ── Category ────────────────────────────────────────────────────────────────

/// Functional area a tool belongs to.
///
/// The set is closed, but values outside it are kept verbatim as
/// [`Category::Unrecognized`] so a stray dataset entry never breaks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Reporting,
    Automation,
    Packaging,
    Troubleshooting,
    Security,
    Configuration,
    Monitoring,
    Migration,
    Other,
    Unrecognized(String),
}

impl Category {
    /// Every known category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Reporting,
        Category::Automation,
        Category::Packaging,
        Category::Troubleshooting,
        Category::Security,
        Category::Configuration,
        Category::Monitoring,
        Category::Migration,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Reporting => "reporting",
            Category::Automation => "automation",
            Category::Packaging => "packaging",
            Category::Troubleshooting => "troubleshooting",
            Category::Security => "security",
            Category::Configuration => "configuration",
            Category::Monitoring => "monitoring",
            Category::Migration => "migration",
            Category::Other => "other",
            Category::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label. Unknown values get the generic "Other" label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Reporting => "Reporting",
            Category::Automation => "Automation",
            Category::Packaging => "Packaging",
            Category::Troubleshooting => "Troubleshooting",
            Category::Security => "Security",
            Category::Configuration => "Configuration",
            Category::Monitoring => "Monitoring",
            Category::Migration => "Migration",
            Category::Other | Category::Unrecognized(_) => "Other",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reporting" => Category::Reporting,
            "automation" => Category::Automation,
            "packaging" => Category::Packaging,
            "troubleshooting" => Category::Troubleshooting,
            "security" => Category::Security,
            "configuration" => Category::Configuration,
            "monitoring" => Category::Monitoring,
            "migration" => Category::Migration,
            "other" => Category::Other,
            _ => Category::Unrecognized(raw),
        }
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Category::from(raw.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tool type ───────────────────────────────────────────────────────────────

/// Delivery form of a tool (script, web app, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolType {
    Script,
    Module,
    WebApp,
    DesktopApp,
    BrowserExtension,
    CliTool,
    ApiWrapper,
    Documentation,
    Other,
    Unrecognized(String),
}

impl ToolType {
    /// Every known tool type, in display order.
    pub const ALL: [ToolType; 9] = [
        ToolType::Script,
        ToolType::Module,
        ToolType::WebApp,
        ToolType::DesktopApp,
        ToolType::BrowserExtension,
        ToolType::CliTool,
        ToolType::ApiWrapper,
        ToolType::Documentation,
        ToolType::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ToolType::Script => "script",
            ToolType::Module => "module",
            ToolType::WebApp => "web-app",
            ToolType::DesktopApp => "desktop-app",
            ToolType::BrowserExtension => "browser-extension",
            ToolType::CliTool => "cli-tool",
            ToolType::ApiWrapper => "api-wrapper",
            ToolType::Documentation => "documentation",
            ToolType::Other => "other",
            ToolType::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label. Unknown values get the generic "Other" label.
    pub fn label(&self) -> &'static str {
        match self {
            ToolType::Script => "Script",
            ToolType::Module => "PowerShell Module",
            ToolType::WebApp => "Web App",
            ToolType::DesktopApp => "Desktop App",
            ToolType::BrowserExtension => "Browser Extension",
            ToolType::CliTool => "CLI Tool",
            ToolType::ApiWrapper => "API Wrapper",
            ToolType::Documentation => "Documentation",
            ToolType::Other | ToolType::Unrecognized(_) => "Other",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ToolType::Unrecognized(_))
    }
}

impl From<String> for ToolType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "script" => ToolType::Script,
            "module" => ToolType::Module,
            "web-app" => ToolType::WebApp,
            "desktop-app" => ToolType::DesktopApp,
            "browser-extension" => ToolType::BrowserExtension,
            "cli-tool" => ToolType::CliTool,
            "api-wrapper" => ToolType::ApiWrapper,
            "documentation" => ToolType::Documentation,
            "other" => ToolType::Other,
            _ => ToolType::Unrecognized(raw),
        }
    }
}

impl From<&str> for ToolType {
    fn from(raw: &str) -> Self {
        ToolType::from(raw.to_string())
    }
}

impl From<ToolType> for String {
    fn from(tool_type: ToolType) -> Self {
        tool_type.as_str().to_string()
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Authors ─────────────────────────────────────────────────────────────────

/// A contributor credited on a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
            github: None,
            twitter: None,
            linkedin: None,
            website: None,
        }
    }
}

/// The legacy single `author` field: either a bare name or a full object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyAuthor {
    Name(String),
    Full(Author),
}

// ── Records ─────────────────────────────────────────────────────────────────

/// External popularity signal taken from the tool's source repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStats {
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
}

/// A tool entry exactly as it appears in the dataset.
///
/// Author information may be spread over the modern `authors` array and
/// several legacy fields; [`ToolRecord::from`] folds them into one list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToolRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    #[serde(default)]
    pub authors: Option<Vec<Author>>,
    #[serde(default)]
    pub author: Option<LegacyAuthor>,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub author_github: Option<String>,
    #[serde(default)]
    pub author_twitter: Option<String>,
    #[serde(default)]
    pub author_linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repo_stats: Option<RepoStats>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub works_with: Vec<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// A normalized directory entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    authors: Vec<Author>,
    pub date_added: Option<DateTime<Utc>>,
    pub repo_stats: Option<RepoStats>,
    pub screenshots: Vec<String>,
    pub keywords: Vec<String>,
    pub works_with: Vec<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub documentation_url: Option<String>,
}

impl ToolRecord {
    /// Contributors, in credit order. Never empty.
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Author names joined for display.
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Screenshots to display, capped at [`MAX_SCREENSHOTS`].
    pub fn display_screenshots(&self) -> &[String] {
        let end = self.screenshots.len().min(MAX_SCREENSHOTS);
        &self.screenshots[..end]
    }
}

impl From<RawToolRecord> for ToolRecord {
    fn from(raw: RawToolRecord) -> Self {
        let authors = tool_authors(&raw);
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            category: raw.category,
            tool_type: raw.tool_type,
            authors,
            date_added: raw.date_added,
            repo_stats: raw.repo_stats,
            screenshots: raw.screenshots,
            keywords: raw.keywords,
            works_with: raw.works_with,
            github_url: raw.github_url,
            website_url: raw.website_url,
            documentation_url: raw.documentation_url,
        }
    }
}

/// Name used when a record credits nobody at all.
pub const PLACEHOLDER_AUTHOR: &str = "Community";

/// Resolve the credited authors of a raw record.
///
/// Prefers the `authors` array; falls back to the legacy `author` field
/// merged with the flat `author*` link fields; falls back to a placeholder.
pub fn tool_authors(raw: &RawToolRecord) -> Vec<Author> {
    if let Some(authors) = &raw.authors {
        let named: Vec<Author> = authors
            .iter()
            .filter(|a| !a.name.trim().is_empty())
            .cloned()
            .collect();
        if !named.is_empty() {
            return named;
        }
    }

    let mut author = match &raw.author {
        Some(LegacyAuthor::Name(name)) if !name.trim().is_empty() => Author::named(name.trim()),
        Some(LegacyAuthor::Full(full)) if !full.name.trim().is_empty() => full.clone(),
        _ => match &raw.author_github {
            Some(handle) if !handle.trim().is_empty() => Author::named(handle.trim()),
            _ => Author::named(PLACEHOLDER_AUTHOR),
        },
    };

    if author.avatar.is_none() {
        author.avatar = raw.author_avatar.clone();
    }
    if author.github.is_none() {
        author.github = raw.author_github.clone();
    }
    if author.twitter.is_none() {
        author.twitter = raw.author_twitter.clone();
    }
    if author.linkedin.is_none() {
        author.linkedin = raw.author_linkedin.clone();
    }

    vec![author]
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates; anything else is absent.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
