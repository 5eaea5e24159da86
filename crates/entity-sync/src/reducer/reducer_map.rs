use std::collections::BTreeMap;
use std::sync::Arc;

use entity_core::EntityStore;

use super::action::EntityAction;
use super::entity_reducer::EntityReducer;

/// One reducer per record type, composed over the whole store.
#[derive(Debug, Clone, Default)]
pub struct EntityReducers {
    reducers: BTreeMap<String, EntityReducer>,
}

impl EntityReducers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `reducer`, replacing any reducer for the same key.
    pub fn insert(&mut self, reducer: EntityReducer) {
        self.reducers.insert(reducer.key().to_string(), reducer);
    }

    pub fn get(&self, key: &str) -> Option<&EntityReducer> {
        self.reducers.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    /// Run every reducer over its slice.
    ///
    /// Untouched slices are shared with `store`; when no slice changed the
    /// same `Arc` comes back. A slice that was absent and would only become
    /// an empty table is left absent.
    pub fn reduce(&self, store: &Arc<EntityStore>, action: &EntityAction) -> Arc<EntityStore> {
        let mut next: Option<EntityStore> = None;

        for (key, reducer) in &self.reducers {
            let before = store.slice(key);
            let after = reducer.reduce(before, action);
            let changed = match before {
                Some(before) => !Arc::ptr_eq(before, &after),
                None => !after.is_empty(),
            };
            if changed {
                next.get_or_insert_with(|| store.as_ref().clone())
                    .insert_slice(key.clone(), after);
            }
        }

        match next {
            Some(next) => Arc::new(next),
            None => Arc::clone(store),
        }
    }
}

impl FromIterator<EntityReducer> for EntityReducers {
    fn from_iter<T: IntoIterator<Item = EntityReducer>>(iter: T) -> Self {
        let mut reducers = Self::new();
        for reducer in iter {
            reducers.insert(reducer);
        }
        reducers
    }
}
