//! Dependency-scoped memoized extraction.
//!
//! An extractor is bound to one record type's dependency closure. Each call
//! projects those slices out of a full store. When every tracked slice is
//! the same `Arc` as on the previous call the previous projection is
//! returned as-is, so consumers can skip their own work with `Arc::ptr_eq`.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use entity_core::{EntityStore, EntityTable};
//! use entity_sync::EntityExtractor;
//!
//! let mut extractor = EntityExtractor::new("books", ["books", "authors"]);
//! let store = EntityStore::new().with_slice("people", Arc::new(EntityTable::new()));
//!
//! let first = extractor.extract(&store);
//! let second = extractor.extract(&store.with_slice("people", Arc::new(EntityTable::new())));
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use entity_core::errors::EntityResult;
use entity_core::{EntityStore, EntityTable};

use crate::graph::{compile_relation_keys, RelationSchema};
use crate::tracing_setup::events;

#[derive(Debug)]
struct CachedProjection {
    /// Handles of the tracked slices, aligned with `EntityExtractor::keys`.
    /// Kept alive while cached so pointer comparison stays sound.
    slices: Vec<Option<Arc<EntityTable>>>,
    result: Arc<EntityStore>,
}

/// Memoized projection of a store onto one record type's dependency set.
///
/// The dependency set is fixed at construction. `extract` takes `&mut self`:
/// the cache has a single owner and concurrent invalidation is ruled out at
/// compile time.
#[derive(Debug)]
pub struct EntityExtractor {
    root: String,
    keys: Vec<String>,
    cache: Option<CachedProjection>,
    recomputations: u64,
}

impl EntityExtractor {
    pub fn new<I, S>(root: impl Into<String>, dependency_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = dependency_keys.into_iter().map(Into::into).collect();
        Self {
            root: root.into(),
            keys: keys.into_iter().collect(),
            cache: None,
            recomputations: 0,
        }
    }

    /// Record type this extractor was built for.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The tracked record types, sorted.
    pub fn dependency_keys(&self) -> &[String] {
        &self.keys
    }

    /// How many times a projection has been (re)built.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Project `store` onto the dependency set.
    ///
    /// Slices missing from `store` appear as empty tables in the result.
    /// Never touches `store`.
    pub fn extract(&mut self, store: &EntityStore) -> Arc<EntityStore> {
        let current: Vec<Option<Arc<EntityTable>>> =
            self.keys.iter().map(|key| store.slice(key).cloned()).collect();

        if let Some(cached) = &self.cache {
            if same_slices(&cached.slices, &current) {
                return Arc::clone(&cached.result);
            }
        }

        let projection = EntityStore::from_slices(self.keys.iter().zip(&current).map(
            |(key, slice)| {
                let table = slice
                    .clone()
                    .unwrap_or_else(|| Arc::new(EntityTable::new()));
                (key.clone(), table)
            },
        ));
        let result = Arc::new(projection);

        self.recomputations += 1;
        events::extractor_recomputed(&self.root, self.keys.len(), self.recomputations);

        self.cache = Some(CachedProjection {
            slices: current,
            result: Arc::clone(&result),
        });
        result
    }

    /// Drop the cached projection.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

fn same_slices(previous: &[Option<Arc<EntityTable>>], current: &[Option<Arc<EntityTable>>]) -> bool {
    previous.len() == current.len()
        && previous
            .iter()
            .zip(current)
            .all(|(before, now)| match (before, now) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            })
}

/// Build an extractor for `root`, compiling its dependency closure once.
pub fn make_extractor(schema: &RelationSchema, root: &str) -> EntityResult<EntityExtractor> {
    let keys = compile_relation_keys(schema, root)?;
    Ok(EntityExtractor::new(root, keys))
}
