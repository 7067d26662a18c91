//! Sort orders for the tool listing.
//!
//! Every order uses a stable sort, so records with equal keys keep their
//! relative input order.

use std::cmp::Ordering;
use std::fmt;

use crate::catalog::ToolRecord;

use super::counts::Counts;

/// Listing order selectable by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Alphabetical,
    Popular,
    MostVoted,
    Newest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Alphabetical,
        SortOrder::Popular,
        SortOrder::MostVoted,
        SortOrder::Newest,
    ];

    /// Parameter value used in URLs and tool inputs.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Alphabetical => "alphabetical",
            SortOrder::Popular => "popular",
            SortOrder::MostVoted => "most-voted",
            SortOrder::Newest => "newest",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alphabetical" | "alpha" | "name" => Some(SortOrder::Alphabetical),
            "popular" | "views" => Some(SortOrder::Popular),
            "most-voted" | "votes" => Some(SortOrder::MostVoted),
            "newest" | "new" | "recent" => Some(SortOrder::Newest),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Alphabetical => "A-Z",
            SortOrder::Popular => "Most popular",
            SortOrder::MostVoted => "Most voted",
            SortOrder::Newest => "Newest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Name ordering: case-insensitive first, exact spelling as the tiebreak.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort `records` in place by `order`.
pub fn sort_records(records: &mut [&ToolRecord], order: SortOrder, counts: &Counts) {
    match order {
        SortOrder::Alphabetical => records.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortOrder::Popular => records.sort_by_key(|r| std::cmp::Reverse(counts.views(&r.id))),
        SortOrder::MostVoted => records.sort_by_key(|r| std::cmp::Reverse(counts.votes(&r.id))),
        // Option orders None first, so reversing puts undated records last.
        SortOrder::Newest => records.sort_by_key(|r| std::cmp::Reverse(r.date_added)),
    }
}
