use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tripmind_core::{KnowledgeCategory, KnowledgeEntry, KnowledgeError};

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    entries: Vec<KnowledgeEntry>,
}

/// Static, tag-indexed reference content. Loaded once at startup and
/// immutable afterwards; picking up edits requires a restart.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeStore {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("failed reading knowledge base: {}", path.as_ref().display())
        })?;
        let parsed: KnowledgeFile =
            serde_json::from_str(&raw).context("invalid knowledge base json")?;

        let store = Self::from_entries(parsed.entries);
        info!(entries = store.entries.len(), "knowledge base loaded");
        Ok(store)
    }

    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Best entry for the category: largest tag overlap with the
    /// requested tags wins, ties resolve to the earliest loaded entry.
    /// No overlap falls back to the category default. A category with
    /// no entries at all is a data-packaging defect, not user input.
    pub fn lookup(
        &self,
        category: KnowledgeCategory,
        tags: &[&str],
    ) -> Result<&KnowledgeEntry, KnowledgeError> {
        let in_category = self
            .entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect::<Vec<_>>();
        if in_category.is_empty() {
            return Err(KnowledgeError::UnknownCategory(category.as_label()));
        }

        let mut best: Option<(&KnowledgeEntry, usize)> = None;
        for entry in in_category.iter().copied() {
            let overlap = entry
                .tags
                .iter()
                .filter(|tag| tags.iter().any(|requested| requested.eq_ignore_ascii_case(tag)))
                .count();
            if overlap > 0 && best.is_none_or(|(_, score)| overlap > score) {
                best = Some((entry, overlap));
            }
        }

        if let Some((entry, _)) = best {
            return Ok(entry);
        }

        Ok(in_category
            .iter()
            .find(|entry| entry.is_default())
            .copied()
            .unwrap_or(in_category[0]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
