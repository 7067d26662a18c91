//! Canonical filter/sort/query state and its shareable URL form.

use std::borrow::Borrow;

use reqwest::Url;

use crate::catalog::{Category, ToolType};

use super::filter::FilterCriteria;
use super::sort::SortOrder;

const PARAM_CATEGORY: &str = "category";
const PARAM_TYPE: &str = "type";
const PARAM_SORT: &str = "sort";
const PARAM_VIEW: &str = "view";
const PARAM_QUERY: &str = "q";

/// Presentation of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_param(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// Every user-selectable dimension of the listing, as one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub tool_type: Option<ToolType>,
    pub sort: SortOrder,
    pub view: ViewMode,
    pub query: String,
}

impl FilterState {
    /// Reset category, type, sort, and query to their defaults in one step.
    /// The view mode is a display preference and survives.
    pub fn clear(&mut self) {
        *self = Self {
            view: self.view,
            ..Self::default()
        };
    }

    /// Whether any filtering dimension differs from its default.
    pub fn is_filtered(&self) -> bool {
        self.category.is_some()
            || self.tool_type.is_some()
            || self.sort != SortOrder::default()
            || !self.query.trim().is_empty()
    }

    pub fn criteria(&self) -> FilterCriteria<'_> {
        FilterCriteria {
            query: &self.query,
            category: self.category.as_ref(),
            tool_type: self.tool_type.as_ref(),
        }
    }

    /// Non-default dimensions as URL query pairs, in a fixed order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push((PARAM_CATEGORY, category.as_str().to_string()));
        }
        if let Some(tool_type) = &self.tool_type {
            pairs.push((PARAM_TYPE, tool_type.as_str().to_string()));
        }
        if self.sort != SortOrder::default() {
            pairs.push((PARAM_SORT, self.sort.as_param().to_string()));
        }
        if self.view != ViewMode::default() {
            pairs.push((PARAM_VIEW, self.view.as_param().to_string()));
        }
        let query = self.query.trim();
        if !query.is_empty() {
            pairs.push((PARAM_QUERY, query.to_string()));
        }
        pairs
    }

    /// Rebuild a state from query pairs. Unknown keys are ignored; unknown
    /// sort or view values fall back to the default.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Borrow<str>,
        V: Borrow<str>,
    {
        let mut state = Self::default();
        for (key, value) in pairs {
            let value = value.borrow();
            match key.borrow() {
                PARAM_CATEGORY if !value.trim().is_empty() => {
                    state.category = Some(Category::from(value))
                }
                PARAM_TYPE if !value.trim().is_empty() => {
                    state.tool_type = Some(ToolType::from(value))
                }
                PARAM_SORT => state.sort = SortOrder::from_param(value).unwrap_or_default(),
                PARAM_VIEW => state.view = ViewMode::from_param(value).unwrap_or_default(),
                PARAM_QUERY => state.query = value.to_string(),
                _ => {}
            }
        }
        state
    }

    /// Shareable link: `base` with its query replaced by this state.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let pairs = self.to_query_pairs();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        url
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query_pairs(url.query_pairs())
    }

    /// Key identifying the inputs that shape the result list (view mode excluded).
    ///
    /// Pairs are JSON-encoded, so a value containing `&` or `=` never reads
    /// as a different combination of filters.
    pub fn fingerprint(&self) -> String {
        let pairs: Vec<_> = self
            .to_query_pairs()
            .into_iter()
            .filter(|(k, _)| *k != PARAM_VIEW)
            .collect();
        serde_json::to_string(&pairs).unwrap_or_default()
    }
}
