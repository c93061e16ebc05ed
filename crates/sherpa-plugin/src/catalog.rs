//! The shared tutorial catalog.
//!
//! One [`TutorialCatalog`] exists per process, owned by the
//! [`PluginManager`](crate::PluginManager) and passed by reference to
//! consumers (runtime, selection surface). Entries are immutable once cached:
//! the catalog hands out `Arc<Tutorial>` clones, never mutable access.
//!
//! # Invariants
//!
//! 1. Every cached tutorial passed [`Tutorial::validate`] at insert time.
//! 2. Ids are unique; on collision the first registration wins and the later
//!    one is rejected (deterministic regardless of reload order).
//! 3. Every cached tutorial carries a `plugin_source` stamp.

use std::collections::HashMap;
use std::sync::Arc;

use sherpa_core::Tutorial;

use crate::error::TutorialRejection;

/// Id-keyed store of loaded tutorials.
#[derive(Debug, Default)]
pub struct TutorialCatalog {
    by_id: HashMap<String, Arc<Tutorial>>,
    /// Insertion order, so listings are stable across runs with the same
    /// load sequence.
    order: Vec<String>,
}

impl TutorialCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a tutorial.
    ///
    /// The caller (the plugin manager) must have stamped `plugin_source`
    /// already. Returns the rejection reason if the tutorial is malformed or
    /// its id is already taken.
    pub fn insert(&mut self, tutorial: Tutorial) -> Result<(), TutorialRejection> {
        let defects = tutorial.validate();
        if !defects.is_empty() {
            return Err(TutorialRejection::Invalid {
                tutorial_id: tutorial.id,
                defects,
            });
        }
        if let Some(existing) = self.by_id.get(&tutorial.id) {
            return Err(TutorialRejection::IdCollision {
                id: tutorial.id.clone(),
                existing_source: existing
                    .plugin_source
                    .clone()
                    .unwrap_or_else(|| "<unknown>".into()),
            });
        }
        self.order.push(tutorial.id.clone());
        self.by_id.insert(tutorial.id.clone(), Arc::new(tutorial));
        Ok(())
    }

    /// Look up a tutorial by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Tutorial>> {
        self.by_id.get(id).cloned()
    }

    /// All tutorials in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<Tutorial>> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    /// Tutorials in the given category, in insertion order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Arc<Tutorial>> {
        self.all()
            .into_iter()
            .filter(|tutorial| tutorial.category == category)
            .collect()
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .all()
            .iter()
            .map(|tutorial| tutorial.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Remove every tutorial supplied by the given plugin.
    ///
    /// Returns how many entries were removed.
    pub fn remove_plugin(&mut self, plugin_id: &str) -> usize {
        let doomed: Vec<String> = self
            .by_id
            .iter()
            .filter(|(_, tutorial)| tutorial.plugin_source.as_deref() == Some(plugin_id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            self.by_id.remove(id);
        }
        self.order.retain(|id| self.by_id.contains_key(id));
        doomed.len()
    }

    /// Number of cached tutorials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
