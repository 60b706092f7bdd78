use crate::{ItemKind, ItemRecord, ItemStore, StoreError};
use serde::{Deserialize, Serialize};

/// Optional predicates for listing a collection. Every supplied predicate must
/// hold (logical AND); an absent or empty predicate imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Exact, case-sensitive category.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive color equality.
    #[serde(default)]
    pub color: Option<String>,
    /// Case-insensitive substring of the location.
    #[serde(default)]
    pub location: Option<String>,
    /// Case-insensitive substring of the item name or description.
    #[serde(default)]
    pub search: Option<String>,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        [&self.category, &self.color, &self.location, &self.search]
            .iter()
            .all(|p| active(p).is_none())
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &ItemRecord) -> bool {
        self.compiled().matches(record)
    }

    fn compiled(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            category: active(&self.category),
            color: active(&self.color).map(str::to_lowercase),
            location: active(&self.location).map(str::to_lowercase),
            search: active(&self.search).map(str::to_lowercase),
        }
    }
}

fn active(predicate: &Option<String>) -> Option<&str> {
    predicate.as_deref().filter(|value| !value.is_empty())
}

/// Predicates with their case folding done once per query.
struct CompiledFilter<'a> {
    category: Option<&'a str>,
    color: Option<String>,
    location: Option<String>,
    search: Option<String>,
}

impl CompiledFilter<'_> {
    fn matches(&self, record: &ItemRecord) -> bool {
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        if let Some(color) = &self.color {
            if record.color.to_lowercase() != *color {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !record.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let in_name = record.item_name.to_lowercase().contains(search.as_str());
            if !in_name && !record.description.to_lowercase().contains(search.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Predicate-based retrieval
impl ItemStore {
    /// Records of `kind` that satisfy `filter`, in insertion order.
    pub fn filter(&self, kind: ItemKind, filter: &ItemFilter) -> Result<Vec<ItemRecord>, StoreError> {
        let records = self.load_all(kind)?;
        if filter.is_unconstrained() {
            return Ok(records);
        }
        let compiled = filter.compiled();
        Ok(records.into_iter().filter(|r| compiled.matches(r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryBackend, NewItem, StoreConfig};

    fn item(name: &str, category: &str, color: &str, location: &str, description: &str) -> NewItem {
        NewItem {
            item_name: name.into(),
            category: category.into(),
            color: color.into(),
            location: location.into(),
            date: "2024-10-02".into(),
            description: description.into(),
            contact_info: "desk@example.com".into(),
            image_ref: None,
            ai_analysis: None,
        }
    }

    fn seeded_store() -> ItemStore {
        let store = ItemStore::with_backend(StoreConfig::new(), Box::new(InMemoryBackend::new()));
        for new in [
            item("iPhone 13", "Electronics", "red", "Main Library", "cracked screen"),
            item("Water bottle", "Accessories", "RED", "Gym", "steel, stickers"),
            item("Laptop charger", "electronics", "Black", "Library annex", ""),
            item("Notebook", "Stationery", "", "Cafeteria", "blue phone number inside"),
        ] {
            store.create(ItemKind::Lost, new).unwrap();
        }
        store
    }

    fn ids(records: &[ItemRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn no_predicates_returns_everything_in_order() {
        let store = seeded_store();
        let all = store.filter(ItemKind::Lost, &ItemFilter::new()).unwrap();
        assert_eq!(ids(&all), vec![1, 2, 3, 4]);
    }

    #[test]
    fn category_is_case_sensitive() {
        let store = seeded_store();
        let hits = store
            .filter(ItemKind::Lost, &ItemFilter::new().with_category("Electronics"))
            .unwrap();
        assert_eq!(ids(&hits), vec![1]);
    }

    #[test]
    fn color_ignores_case() {
        let store = seeded_store();
        let hits = store
            .filter(ItemKind::Lost, &ItemFilter::new().with_color("Red"))
            .unwrap();
        assert_eq!(ids(&hits), vec![1, 2]);
    }

    #[test]
    fn location_is_substring_match() {
        let store = seeded_store();
        let hits = store
            .filter(ItemKind::Lost, &ItemFilter::new().with_location("LIBRARY"))
            .unwrap();
        assert_eq!(ids(&hits), vec![1, 3]);
    }

    #[test]
    fn search_covers_name_and_description() {
        let store = seeded_store();
        let hits = store
            .filter(ItemKind::Lost, &ItemFilter::new().with_search("phone"))
            .unwrap();
        assert_eq!(ids(&hits), vec![1, 4]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let store = seeded_store();
        let filter = ItemFilter::new().with_color("red").with_location("gym");
        let hits = store.filter(ItemKind::Lost, &filter).unwrap();
        assert_eq!(ids(&hits), vec![2]);
    }

    #[test]
    fn empty_predicate_is_ignored() {
        let store = seeded_store();
        let hits = store
            .filter(ItemKind::Lost, &ItemFilter::new().with_category(""))
            .unwrap();
        assert_eq!(hits.len(), 4);
    }
}
