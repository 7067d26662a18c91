//! Related-tool scoring.
//!
//! Related tools are ranked by shared tags: keyword overlap weighs most,
//! then shared `worksWith` targets, then matching category and type.

use std::collections::HashSet;

use super::store::ToolStore;
use super::types::ToolRecord;

const KEYWORD_WEIGHT: u32 = 3;
const WORKS_WITH_WEIGHT: u32 = 2;
const CATEGORY_WEIGHT: u32 = 1;
const TYPE_WEIGHT: u32 = 1;

/// A related tool and its overlap score.
#[derive(Debug, Clone)]
pub struct RelatedTool<'a> {
    pub record: &'a ToolRecord,
    pub score: u32,
}

fn tag_set(tags: &[String]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Overlap score between two records.
pub fn relatedness(a: &ToolRecord, b: &ToolRecord) -> u32 {
    let shared_keywords = tag_set(&a.keywords)
        .intersection(&tag_set(&b.keywords))
        .count() as u32;
    let shared_targets = tag_set(&a.works_with)
        .intersection(&tag_set(&b.works_with))
        .count() as u32;

    let mut score = shared_keywords * KEYWORD_WEIGHT + shared_targets * WORKS_WITH_WEIGHT;
    if a.category == b.category {
        score += CATEGORY_WEIGHT;
    }
    if a.tool_type == b.tool_type {
        score += TYPE_WEIGHT;
    }
    score
}

/// Tools related to `id`, best first, dataset order among equal scores.
///
/// Returns `None` when `id` is not in the store.
pub fn related_tools<'a>(
    store: &'a ToolStore,
    id: &str,
    limit: usize,
) -> Option<Vec<RelatedTool<'a>>> {
    let target = store.get(id)?;
    let mut related: Vec<RelatedTool<'a>> = store
        .all()
        .iter()
        .filter(|r| r.id != target.id)
        .map(|r| RelatedTool {
            record: r,
            score: relatedness(target, r),
        })
        .filter(|r| r.score > 0)
        .collect();
    related.sort_by(|a, b| b.score.cmp(&a.score));
    related.truncate(limit);
    Some(related)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ToolStore {
        ToolStore::from_json_str(
            r#"[
            {"id": "base", "name": "Base", "category": "reporting", "type": "script",
             "keywords": ["Intune", "devices"], "worksWith": ["graph"]},
            {"id": "kw", "name": "Keyword Twin", "category": "security", "type": "web-app",
             "keywords": ["intune"]},
            {"id": "cat", "name": "Same Category", "category": "reporting", "type": "web-app"},
            {"id": "none", "name": "Unrelated", "category": "security", "type": "web-app"},
            {"id": "both", "name": "Both", "category": "reporting", "type": "script",
             "keywords": ["devices"], "worksWith": ["Graph"]}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn scores_rank_keyword_and_target_overlap_highest() {
        let store = store();
        let related = related_tools(&store, "base", 10).unwrap();
        let ids: Vec<_> = related.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["both", "kw", "cat"]);
        assert_eq!(related[0].score, 3 + 2 + 1 + 1);
        assert_eq!(related[1].score, 3);
    }

    #[test]
    fn limit_and_unknown_id() {
        let store = store();
        assert_eq!(related_tools(&store, "base", 1).unwrap().len(), 1);
        assert!(related_tools(&store, "missing", 5).is_none());
    }
}
