use crate::model::{CatalogEntry, DataFileError};
use crate::storage::read_json_file;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Immutable product list. Shared between requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_category(&self, category: &str) -> Vec<CatalogEntry> {
        let category = category.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.category.to_lowercase() == category)
            .cloned()
            .collect()
    }

    /// `(category, count)` in order of first appearance.
    pub fn categories_summary(&self) -> Vec<(String, usize)> {
        let mut summary: Vec<(String, usize)> = Vec::new();
        for entry in &self.entries {
            match summary.iter_mut().find(|(c, _)| *c == entry.category) {
                Some((_, count)) => *count += 1,
                None => summary.push((entry.category.clone(), 1)),
            }
        }
        summary
    }
}

/// Loads every catalog file and concatenates them in the given order.
pub fn load_catalog(paths: &[String]) -> Result<Catalog, DataFileError> {
    let mut entries = Vec::new();
    for path in paths {
        let loaded: Vec<CatalogEntry> = read_json_file(path)?;
        info!("Loaded {} products from {}", loaded.len(), path);
        entries.extend(loaded);
    }
    Ok(Catalog::new(entries))
}

/// Holds the current catalog snapshot. Reloads publish a whole new snapshot;
/// readers keep whatever `Arc` they already took.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn replace(&self, catalog: Catalog) {
        let next = Arc::new(catalog);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture_entries() -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for raw in [
        include_str!("../../data/database/pernos.json"),
        include_str!("../../data/database/tuercas.json"),
        include_str!("../../data/database/volandas.json"),
    ] {
        let loaded: Vec<CatalogEntry> = serde_json::from_str(raw).unwrap();
        entries.extend(loaded);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_has_six_of_each_category() {
        let catalog = Catalog::new(fixture_entries());
        assert_eq!(catalog.len(), 18);
        assert_eq!(
            catalog.categories_summary(),
            vec![
                ("perno".to_string(), 6),
                ("tuerca".to_string(), 6),
                ("volanda".to_string(), 6)
            ]
        );
    }

    #[test]
    fn first_entry_carries_all_fields() {
        let catalog = Catalog::new(fixture_entries());
        let pernos = catalog.find_by_category("perno");
        let first = &pernos[0];
        assert_eq!(first.code, "P-001");
        assert_eq!(first.display_name, "Perno Hexagonal 1/4\" x 2\" Acero Zincado");
        assert_eq!(first.stock_quantity, 1200);
        assert_eq!(first.unit_price, 0.45);
        assert_eq!(first.wholesale_price, 0.38);
    }

    #[test]
    fn category_lookup_is_case_insensitive() {
        let catalog = Catalog::new(fixture_entries());
        let volandas = catalog.find_by_category("VOLANDA");
        assert_eq!(volandas.len(), 6);
        assert!(volandas.iter().all(|e| e.category == "volanda"));
        assert!(catalog.find_by_category("arandela").is_empty());
    }

    #[test]
    fn category_lookup_folds_accented_case() {
        let mut entry = fixture_entries().remove(0);
        entry.category = "arandela ñ".to_string();
        let catalog = Catalog::new(vec![entry]);
        assert_eq!(catalog.find_by_category("ARANDELA Ñ").len(), 1);
    }

    #[test]
    fn load_catalog_reads_files_in_order() {
        let base = env!("CARGO_MANIFEST_DIR");
        let paths: Vec<String> = ["volandas", "pernos"]
            .iter()
            .map(|name| format!("{}/data/database/{}.json", base, name))
            .collect();
        let catalog = load_catalog(&paths).unwrap();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.entries()[0].code, "V-001");
        assert_eq!(catalog.entries()[6].code, "P-001");
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let err = load_catalog(&["does/not/exist.json".to_string()]).unwrap_err();
        assert!(matches!(err, DataFileError::Io { .. }));
    }

    #[test]
    fn replace_publishes_new_snapshot_without_touching_old() {
        let store = CatalogStore::new(Catalog::new(fixture_entries()));
        let before = store.snapshot();
        store.replace(Catalog::new(Vec::new()));
        assert_eq!(before.len(), 18);
        assert!(store.snapshot().is_empty());
    }
}
