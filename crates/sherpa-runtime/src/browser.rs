//! Catalog browsing.
//!
//! Read-only views over the [`TutorialCatalog`] for a tutorial picker:
//! flat listing, category grouping, and a per-tutorial detail view. All of
//! it is derived on demand; nothing here caches or mutates.

use std::sync::Arc;

use sherpa_core::{Difficulty, Tutorial};
use sherpa_plugin::TutorialCatalog;

/// One row of the tutorial listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub estimated_minutes: u32,
    pub step_count: usize,
    /// Plugin the tutorial came from.
    pub plugin_source: Option<String>,
}

impl TutorialRow {
    fn from_tutorial(tutorial: &Tutorial) -> Self {
        Self {
            id: tutorial.id.clone(),
            title: tutorial.title.clone(),
            category: tutorial.category.clone(),
            difficulty: tutorial.difficulty,
            estimated_minutes: tutorial.estimated_minutes,
            step_count: tutorial.steps.len(),
            plugin_source: tutorial.plugin_source.clone(),
        }
    }

    /// Short summary line, e.g. `"beginner · 5 min · 3 steps"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} · {} min · {} steps",
            self.difficulty, self.estimated_minutes, self.step_count
        )
    }
}

/// All rows of one category, in catalog insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub category: String,
    pub rows: Vec<TutorialRow>,
}

/// Everything the picker shows for a selected tutorial.
#[derive(Debug, Clone)]
pub struct TutorialDetail {
    pub row: TutorialRow,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub step_titles: Vec<String>,
    pub tutorial: Arc<Tutorial>,
}

/// Every loaded tutorial, in catalog insertion order.
#[must_use]
pub fn all_rows(catalog: &TutorialCatalog) -> Vec<TutorialRow> {
    catalog
        .all()
        .iter()
        .map(|tutorial| TutorialRow::from_tutorial(tutorial))
        .collect()
}

/// Tutorials grouped by category, categories sorted alphabetically.
#[must_use]
pub fn by_category(catalog: &TutorialCatalog) -> Vec<CategoryListing> {
    catalog
        .categories()
        .into_iter()
        .map(|category| {
            let rows = catalog
                .by_category(&category)
                .iter()
                .map(|tutorial| TutorialRow::from_tutorial(tutorial))
                .collect();
            CategoryListing { category, rows }
        })
        .collect()
}

/// Detail view for one tutorial.
#[must_use]
pub fn detail(catalog: &TutorialCatalog, id: &str) -> Option<TutorialDetail> {
    let tutorial = catalog.get(id)?;
    Some(TutorialDetail {
        row: TutorialRow::from_tutorial(&tutorial),
        prerequisites: tutorial.prerequisites.clone(),
        learning_objectives: tutorial.learning_objectives.clone(),
        step_titles: tutorial.steps.iter().map(|s| s.title.clone()).collect(),
        tutorial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sherpa_core::Step;

    fn catalog() -> TutorialCatalog {
        let mut catalog = TutorialCatalog::new();
        for (id, category, minutes) in [
            ("queries", "sql", 10),
            ("joins", "sql", 15),
            ("charts", "reporting", 5),
        ] {
            let mut tutorial = Tutorial::new(id, format!("Learn {id}"))
                .category(category)
                .estimated_minutes(minutes)
                .objective(format!("understand {id}"))
                .step(Step::new("intro"))
                .step(Step::new("practice"));
            tutorial.plugin_source = Some("demo-pack".into());
            catalog.insert(tutorial).unwrap();
        }
        catalog
    }

    #[test]
    fn all_rows_preserve_insertion_order() {
        let rows = all_rows(&catalog());
        let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["queries", "joins", "charts"]);
        assert_eq!(rows[0].step_count, 2);
        assert_eq!(rows[0].plugin_source.as_deref(), Some("demo-pack"));
    }

    #[test]
    fn by_category_groups_and_sorts_categories() {
        let listings = by_category(&catalog());
        let categories: Vec<_> = listings.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(categories, vec!["reporting", "sql"]);
        assert_eq!(listings[1].rows.len(), 2);
    }

    #[test]
    fn detail_exposes_steps_and_objectives() {
        let detail = detail(&catalog(), "joins").unwrap();
        assert_eq!(detail.step_titles, vec!["intro", "practice"]);
        assert_eq!(detail.learning_objectives, vec!["understand joins"]);
        assert_eq!(detail.row.summary(), "beginner · 15 min · 2 steps");
    }

    #[test]
    fn detail_of_unknown_id_is_none() {
        assert!(detail(&catalog(), "missing").is_none());
    }
}
