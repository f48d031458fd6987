//! Per-instance collection cache.
//!
//! Session-cached search types (see [`SearchType::session_cached`]) fetch
//! their full collection once per instance and filter locally afterwards.
//! The cache is keyed by the subdomain it was filled from: switching the
//! active instance drops every cached collection, forcing a fresh fetch on
//! next access.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::client::ZendeskClient;
use crate::error::Result;
use crate::search::{self, SearchItem, SearchType};

#[derive(Default)]
struct CacheState {
    /// Subdomain the cached collections belong to
    subdomain: Option<String>,
    collections: HashMap<SearchType, Vec<SearchItem>>,
}

/// Shared, mutex-guarded collection cache. Cheap to share via `Arc`.
#[derive(Default)]
pub struct SessionCache {
    inner: Mutex<CacheState>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-key the cache to `subdomain`, dropping every cached collection if
    /// it was filled from a different instance.
    pub fn activate(&self, subdomain: &str) {
        let mut state = self.inner.lock();
        if state.subdomain.as_deref() != Some(subdomain) {
            if state.subdomain.is_some() {
                info!(
                    from = ?state.subdomain,
                    to = subdomain,
                    "Instance switched, dropping cached collections"
                );
            }
            state.collections.clear();
            state.subdomain = Some(subdomain.to_string());
        }
    }

    /// The full collection for `ty`, from cache when the client still
    /// targets the instance the cache was filled from, fetched otherwise.
    pub fn collection(&self, client: &ZendeskClient, ty: SearchType) -> Result<Vec<SearchItem>> {
        self.activate(client.subdomain());
        {
            let state = self.inner.lock();
            if let Some(items) = state.collections.get(&ty) {
                debug!(search_type = ty.label(), len = items.len(), "Collection cache hit");
                return Ok(items.clone());
            }
        }

        // Fetch outside the lock; searches are serialized by the debounce
        // worker, so a duplicate fetch here is possible but harmless.
        let fetched = search::fetch_collection_items(client, ty)?;
        debug!(
            search_type = ty.label(),
            len = fetched.len(),
            "Collection fetched"
        );

        let mut state = self.inner.lock();
        if state.subdomain.as_deref() == Some(client.subdomain()) {
            state.collections.insert(ty, fetched.clone());
        }
        Ok(fetched)
    }

    /// Drop everything. Called on instance switch and on explicit refresh.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.subdomain = None;
        state.collections.clear();
    }

    /// Subdomain the cache currently belongs to, if filled.
    pub fn active_subdomain(&self) -> Option<String> {
        self.inner.lock().subdomain.clone()
    }

    /// Whether a collection for `ty` is currently cached.
    pub fn contains(&self, ty: SearchType) -> bool {
        self.inner.lock().collections.contains_key(&ty)
    }

    #[cfg(test)]
    fn seed(&self, subdomain: &str, ty: SearchType, items: Vec<SearchItem>) {
        let mut state = self.inner.lock();
        state.subdomain = Some(subdomain.to_string());
        state.collections.insert(ty, items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Instance;
    use crate::models::Group;

    fn client_for(subdomain: &str) -> ZendeskClient {
        ZendeskClient::new(Instance::new(subdomain, "agent@acme.com", "tok")).unwrap()
    }

    fn groups(names: &[&str]) -> Vec<SearchItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                SearchItem::Group(Group {
                    id: i as u64 + 1,
                    name: name.to_string(),
                    description: None,
                    default: false,
                    deleted: false,
                    created_at: None,
                    updated_at: None,
                })
            })
            .collect()
    }

    #[test]
    fn test_cached_collection_is_returned_without_fetching() {
        let cache = SessionCache::new();
        cache.seed("acme", SearchType::Groups, groups(&["Support", "Billing"]));

        // Same instance: served from cache, no network touched (the client
        // points at a nonexistent host, so a fetch would error).
        let client = client_for("acme");
        let collection = cache.collection(&client, SearchType::Groups).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_instance_switch_drops_cached_collections() {
        let cache = SessionCache::new();
        cache.seed("acme", SearchType::Groups, groups(&["Support"]));
        cache.seed("acme", SearchType::Automations, vec![]);
        assert!(cache.contains(SearchType::Groups));

        // Activating a different subdomain drops every stale collection.
        cache.activate("acme-eu");

        assert!(!cache.contains(SearchType::Groups));
        assert!(!cache.contains(SearchType::Automations));
        assert_eq!(cache.active_subdomain().as_deref(), Some("acme-eu"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let cache = SessionCache::new();
        cache.seed("acme", SearchType::CustomRoles, vec![]);
        cache.reset();
        assert!(!cache.contains(SearchType::CustomRoles));
        assert_eq!(cache.active_subdomain(), None);
    }
}
