//! Read-only, in-memory tool record store.

use std::collections::HashMap;
use std::path::Path;

use super::error::CatalogError;
use super::types::{Category, RawToolRecord, ToolRecord, ToolType};

/// The full tool dataset, in dataset order, indexed by id.
#[derive(Debug, Default)]
pub struct ToolStore {
    records: Vec<ToolRecord>,
    by_id: HashMap<String, usize>,
}

impl ToolStore {
    /// Build a store from already-parsed raw records.
    pub fn from_raw(raw: Vec<RawToolRecord>) -> Result<Self, CatalogError> {
        let mut records = Vec::with_capacity(raw.len());
        let mut by_id = HashMap::with_capacity(raw.len());
        for r in raw {
            if by_id.contains_key(&r.id) {
                return Err(CatalogError::DuplicateId(r.id));
            }
            by_id.insert(r.id.clone(), records.len());
            records.push(ToolRecord::from(r));
        }
        Ok(Self { records, by_id })
    }

    /// Parse a JSON array of tool objects.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawToolRecord> =
            serde_json::from_str(json).map_err(|source| CatalogError::Json {
                path: "<inline>".into(),
                source,
            })?;
        Self::from_raw(raw)
    }

    /// Load the dataset from disk.
    ///
    /// `path` may be a single file holding a JSON array, or a directory with
    /// one JSON object per `*.json` file. Directory entries are read in file
    /// name order so the dataset order is reproducible.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io_err)?;
        let raw = if metadata.is_dir() {
            let mut files: Vec<_> = std::fs::read_dir(path)
                .map_err(io_err)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            files.sort();

            let mut raw = Vec::with_capacity(files.len());
            for file in files {
                raw.push(read_json::<RawToolRecord>(&file)?);
            }
            raw
        } else {
            read_json::<Vec<RawToolRecord>>(path)?
        };

        let store = Self::from_raw(raw)?;
        tracing::info!(path = %path.display(), tools = store.len(), "Loaded tool dataset");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in dataset order.
    pub fn all(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ToolRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Tool ids starting with `prefix` (case-insensitive), for completions.
    pub fn ids_with_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.id.to_lowercase().starts_with(&prefix))
            .take(limit)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Number of tools per known category, including empty ones.
    /// Unrecognized categories are counted under their raw value.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        for record in &self.records {
            match counts.iter_mut().find(|(c, _)| *c == record.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.category.clone(), 1)),
            }
        }
        counts
    }

    /// Number of tools per known tool type, including empty ones.
    pub fn type_counts(&self) -> Vec<(ToolType, usize)> {
        let mut counts: Vec<(ToolType, usize)> =
            ToolType::ALL.into_iter().map(|t| (t, 0)).collect();
        for record in &self.records {
            match counts.iter_mut().find(|(t, _)| *t == record.tool_type) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.tool_type.clone(), 1)),
            }
        }
        counts
    }

    /// Tools with repository stats, most starred first (forks break ties).
    pub fn most_popular(&self, limit: usize) -> Vec<&ToolRecord> {
        let mut ranked: Vec<&ToolRecord> = self
            .records
            .iter()
            .filter(|r| r.repo_stats.is_some())
            .collect();
        ranked.sort_by(|a, b| {
            let a = a.repo_stats.unwrap_or_default();
            let b = b.repo_stats.unwrap_or_default();
            b.stars.cmp(&a.stars).then(b.forks.cmp(&a.forks))
        });
        ranked.truncate(limit);
        ranked
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {"id": "autopilot-reset", "name": "Autopilot Reset Tool", "category": "automation",
         "type": "script", "author": "Jo", "repoStats": {"stars": 40, "forks": 3}},
        {"id": "compliance-report", "name": "Compliance Report", "category": "reporting",
         "type": "web-app", "authors": [{"name": "Sam"}], "repoStats": {"stars": 40, "forks": 9}},
        {"id": "odd", "name": "Odd One", "category": "quantum", "type": "script"}
    ]"#;

    #[test]
    fn loads_inline_dataset_and_indexes_by_id() {
        let store = ToolStore::from_json_str(DATASET).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("compliance-report").unwrap().name, "Compliance Report");
        assert!(store.get("missing").is_none());
        assert_eq!(store.all()[0].id, "autopilot-reset");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": "x", "name": "One", "category": "other", "type": "other"},
            {"id": "x", "name": "Two", "category": "other", "type": "other"}
        ]"#;
        let err = ToolStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "x"));
    }

    #[test]
    fn category_counts_include_unrecognized_values() {
        let store = ToolStore::from_json_str(DATASET).unwrap();
        let counts = store.category_counts();
        assert!(counts.contains(&(Category::Automation, 1)));
        assert!(counts.contains(&(Category::Security, 0)));
        assert!(counts.contains(&(Category::Unrecognized("quantum".into()), 1)));

        let types = store.type_counts();
        assert!(types.contains(&(ToolType::Script, 2)));
    }

    #[test]
    fn most_popular_orders_by_stars_then_forks() {
        let store = ToolStore::from_json_str(DATASET).unwrap();
        let ids: Vec<_> = store.most_popular(10).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["compliance-report", "autopilot-reset"]);
    }

    #[test]
    fn ids_with_prefix_is_case_insensitive() {
        let store = ToolStore::from_json_str(DATASET).unwrap();
        assert_eq!(store.ids_with_prefix("AUTO", 5), vec!["autopilot-reset"]);
    }

    #[test]
    fn loads_directory_of_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"id": "b", "name": "Bee", "category": "other", "type": "other"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"id": "a", "name": "Ay", "category": "other", "type": "other"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = ToolStore::load(dir.path()).unwrap();
        let ids: Vec<_> = store.all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn load_reports_bad_json_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tools.json");
        std::fs::write(&file, "{ not json").unwrap();

        let err = ToolStore::load(&file).unwrap_err();
        assert!(matches!(err, CatalogError::Json { ref path, .. } if path == &file));
    }
}
