//! Keyword, category, and type filtering.

use crate::catalog::{Category, ToolRecord, ToolType};

/// Constraints applied together (logical AND). `None` / blank means "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCriteria<'q> {
    pub query: &'q str,
    pub category: Option<&'q Category>,
    pub tool_type: Option<&'q ToolType>,
}

impl FilterCriteria<'_> {
    /// Whether `record` satisfies the category and type constraints.
    pub fn matches_facets(&self, record: &ToolRecord) -> bool {
        self.category.is_none_or(|c| *c == record.category)
            && self.tool_type.is_none_or(|t| *t == record.tool_type)
    }

    /// Whether `record` satisfies every constraint.
    pub fn matches(&self, record: &ToolRecord) -> bool {
        self.matches_facets(record) && matches_text(record, self.query)
    }
}

/// Case-insensitive substring test against the name, the description, or any
/// single author name. A blank query matches everything.
pub fn matches_text(record: &ToolRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(&needle);
    contains(&record.name)
        || contains(&record.description)
        || record.authors().iter().any(|a| contains(&a.name))
}

/// Records matching `criteria`, in input order.
pub fn keyword_filter<'a, I>(records: I, criteria: &FilterCriteria<'_>) -> Vec<&'a ToolRecord>
where
    I: IntoIterator<Item = &'a ToolRecord>,
{
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}
