//! Dependency closure over relation declarations.
//!
//! Relation graphs are routinely cyclic (a book belongs to a library whose
//! books point back at it), so traversal tracks visited types explicitly.
//!
//! # Examples
//!
//! ```
//! use entity_core::{has_many, has_one, Relations};
//! use entity_sync::{compile_relation_keys, RelationSchema};
//!
//! let mut schema = RelationSchema::new();
//! schema.insert("books", Relations::from([("library".to_string(), has_one("libraries"))]));
//! schema.insert("libraries", Relations::from([("books".to_string(), has_many("books"))]));
//!
//! let keys = compile_relation_keys(&schema, "books").unwrap();
//! assert_eq!(keys.len(), 2);
//! assert!(keys.contains("books") && keys.contains("libraries"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use entity_core::errors::{ConfigurationError, EntityResult};
use entity_core::{EntityConfig, Relations};

/// Static relation declarations of every registered record type.
#[derive(Debug, Clone, Default)]
pub struct RelationSchema {
    relations: BTreeMap<String, Relations>,
}

impl RelationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs<'a>(configs: impl IntoIterator<Item = &'a EntityConfig>) -> Self {
        Self {
            relations: configs
                .into_iter()
                .map(|config| (config.key.clone(), config.relations.clone()))
                .collect(),
        }
    }

    /// Declare (or redeclare) the relations of `key`.
    pub fn insert(&mut self, key: impl Into<String>, relations: Relations) {
        self.relations.insert(key.into(), relations);
    }

    pub fn relations(&self, key: &str) -> Option<&Relations> {
        self.relations.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.relations.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    /// Check that every relation targets a declared record type.
    pub fn validate(&self) -> EntityResult<()> {
        for (entity, relations) in &self.relations {
            for (field, relation) in relations {
                if !self.relations.contains_key(&relation.target) {
                    return Err(ConfigurationError::UnknownRelationTarget {
                        entity: entity.clone(),
                        field: field.clone(),
                        target: relation.target.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Every record type reachable from `root` along relation edges, `root`
/// included, each exactly once.
///
/// Depends only on the declarations, never on store contents. Fails if
/// `root` or any reachable relation target is undeclared.
pub fn compile_relation_keys(schema: &RelationSchema, root: &str) -> EntityResult<BTreeSet<String>> {
    if !schema.contains(root) {
        return Err(ConfigurationError::UnknownEntity {
            key: root.to_string(),
        }
        .into());
    }

    let mut visited = BTreeSet::new();
    let mut stack = vec![root.to_string()];

    while let Some(key) = stack.pop() {
        if visited.contains(&key) {
            continue;
        }
        let relations = schema
            .relations(&key)
            .ok_or_else(|| ConfigurationError::UnknownEntity { key: key.clone() })?;

        for (field, relation) in relations {
            if !schema.contains(&relation.target) {
                return Err(ConfigurationError::UnknownRelationTarget {
                    entity: key.clone(),
                    field: field.clone(),
                    target: relation.target.clone(),
                }
                .into());
            }
            if !visited.contains(&relation.target) {
                stack.push(relation.target.clone());
            }
        }
        visited.insert(key);
    }

    Ok(visited)
}
