//! Hybrid keyword / AI search pipeline.
//!
//! input → debounce → derived mode → keyword filter or AI relevance →
//! category/type intersection → sort → paginate.

pub mod ai;
pub mod compose;
pub mod counts;
pub mod debounce;
pub mod filter;
pub mod paginate;
pub mod query_log;
pub mod session;
pub mod sort;
pub mod state;

pub use ai::{AiLookup, AiSearch, PendingLookup};
pub use compose::{AiResults, Composition, Hit, Outcome, SearchMode, compose};
pub use counts::{Counts, CountsTracker, VoteOutcome};
pub use debounce::Debouncer;
pub use filter::{FilterCriteria, keyword_filter, matches_text};
pub use paginate::{IncrementalReveal, Page, Paged};
pub use query_log::QueryLog;
pub use session::{ListedTool, SearchSession, SessionPage, SessionView};
pub use sort::{SortOrder, sort_records};
pub use state::{FilterState, ViewMode};
