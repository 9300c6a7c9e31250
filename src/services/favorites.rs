use tracing::{info, warn};

use crate::model::card::Card;
use crate::model::favorite::FavoriteEntry;
use crate::services::cache::{KeyValueCache, FAVORITES_KEY};

/// Favorited card snapshots, unique by id, mirrored to the cache.
#[derive(Debug, Default)]
pub struct FavoritesStore {
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    pub fn load(cache: &KeyValueCache) -> Self {
        let mut entries: Vec<FavoriteEntry> = cache.get(FAVORITES_KEY).unwrap_or_default();

        // Older writes may carry the same id twice; first one wins.
        let mut seen = std::collections::HashSet::new();
        entries.retain(|e| seen.insert(e.id.clone()));

        info!(count = entries.len(), "favorites loaded");
        FavoritesStore { entries }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Adds the card if absent, removes it if present. Returns the new membership.
    pub fn toggle(&mut self, card: &Card) -> bool {
        if self.remove(&card.id) {
            false
        } else {
            self.entries.push(FavoriteEntry::from_card(card));
            true
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Best effort: a failed write is logged and the in-memory list stays authoritative.
    pub fn persist(&self, cache: &mut KeyValueCache) {
        if let Err(e) = cache.set(FAVORITES_KEY, &self.entries) {
            warn!(error = %e, "failed to persist favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::Cuisine;
    use crate::services::cache::MemoryStorage;

    fn card(id: &str) -> Card {
        Card {
            id: id.into(),
            title: "Cappuccino cake".into(),
            image_url: String::new(),
            cuisine: Cuisine::Italian,
            cuisine_label: "Italy".into(),
            cooking_minutes: 40.0,
            popularity: 3.0,
            ingredients: vec!["espresso".into()],
        }
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut store = FavoritesStore::default();
        store.toggle(&card("a"));
        let before: Vec<String> = store.entries().iter().map(|e| e.id.clone()).collect();

        assert!(store.toggle(&card("b")));
        assert!(!store.toggle(&card("b")));

        let after: Vec<String> = store.entries().iter().map(|e| e.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn persisted_list_reloads() {
        let mut cache = KeyValueCache::new(MemoryStorage::new());
        let mut store = FavoritesStore::default();
        store.toggle(&card("1"));
        store.toggle(&card("2"));
        store.persist(&mut cache);

        let reloaded = FavoritesStore::load(&cache);
        assert!(reloaded.contains("1"));
        assert!(reloaded.contains("2"));
        assert_eq!(reloaded.entries()[0].snapshot, card("1"));
    }

    #[test]
    fn corrupt_favorites_load_empty() {
        let cache = KeyValueCache::new(MemoryStorage::new().with_slot(FAVORITES_KEY, "{oops"));
        assert!(FavoritesStore::load(&cache).entries().is_empty());
    }

    #[test]
    fn duplicate_ids_collapse_on_load() {
        let mut cache = KeyValueCache::new(MemoryStorage::new());
        let dup = vec![FavoriteEntry::from_card(&card("x")), FavoriteEntry::from_card(&card("x"))];
        cache.set(FAVORITES_KEY, &dup).unwrap();

        assert_eq!(FavoritesStore::load(&cache).entries().len(), 1);
    }
}
