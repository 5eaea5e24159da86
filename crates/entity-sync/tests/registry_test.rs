use std::collections::BTreeMap;
use std::sync::Arc;

use entity_core::config::SyncConfig;
use entity_core::errors::{ConfigurationError, EntityError};
use entity_core::{
    has_many, has_one, EntityConfig, EntityOptions, EntityStore, Operation, RecordId, Relations,
};
use entity_sync::{EntityAction, EntityRegistry};
use serde_json::json;

fn rel(field: &str, relation: entity_core::Relation) -> Relations {
    Relations::from([(field.to_string(), relation)])
}

fn library_registry() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    registry
        .register("books", rel("library", has_one("libraries")), None)
        .unwrap()
        .register("libraries", rel("books", has_many("books")), None)
        .unwrap()
        .register("people", Relations::new(), None)
        .unwrap();
    registry
}

#[test]
fn register_uses_default_options() {
    let mut registry = EntityRegistry::new();
    registry.register("book", Relations::new(), None).unwrap();

    let config = registry.config("book").unwrap();
    assert_eq!(config.key, "book");
    assert!(config.relations.is_empty());
    assert_eq!(config.options.id_attribute, "id");
    assert!(config.options.process_strategy.is_none());
    assert_eq!(config.options.operations, Operation::ALL.to_vec());
}

#[test]
fn default_id_attribute_comes_from_config() {
    let mut registry = EntityRegistry::with_config(SyncConfig {
        default_id_attribute: "uuid".to_string(),
        ..SyncConfig::default()
    });
    registry.register("book", Relations::new(), None).unwrap();
    assert_eq!(registry.config("book").unwrap().options.id_attribute, "uuid");
    assert_eq!(registry.sync_config().default_id_attribute, "uuid");
}

#[test]
fn entity_requires_init() {
    let mut registry = library_registry();
    assert!(!registry.is_initialized());
    assert!(matches!(
        registry.entity("books"),
        Err(EntityError::Configuration(ConfigurationError::NotInitialized))
    ));

    registry.init().unwrap();
    assert!(registry.is_initialized());
    let books = registry.entity("books").unwrap();
    assert_eq!(books.key(), "books");
    assert_eq!(books.id_attribute(), "id");
    assert_eq!(
        books.dependency_keys().iter().collect::<Vec<_>>(),
        vec!["books", "libraries"]
    );
    assert!(matches!(
        registry.entity("shelves"),
        Err(EntityError::Configuration(ConfigurationError::UnknownEntity { .. }))
    ));
}

#[test]
fn registration_order_is_free() {
    let mut registry = EntityRegistry::new();
    registry
        .register("libraries", rel("books", has_many("books")), None)
        .unwrap();
    registry
        .register("books", rel("library", has_one("libraries")), None)
        .unwrap();
    assert!(registry.init().is_ok());
}

#[test]
fn init_rejects_unknown_targets() {
    let mut registry = EntityRegistry::new();
    registry
        .register("books", rel("author", has_one("authors")), None)
        .unwrap();
    let err = registry.init().unwrap_err();
    assert!(matches!(
        err,
        EntityError::Configuration(ConfigurationError::UnknownRelationTarget { .. })
    ));
    assert!(!registry.is_initialized());
}

#[test]
fn empty_key_is_rejected() {
    let mut registry = EntityRegistry::new();
    assert!(matches!(
        registry.register(" ", Relations::new(), None),
        Err(EntityError::Configuration(ConfigurationError::EmptyKey))
    ));
}

#[test]
fn registering_after_init_requires_reinit() {
    let mut registry = library_registry();
    registry.init().unwrap();
    registry.register("authors", Relations::new(), None).unwrap();
    assert!(registry.entity("books").is_err());

    registry.init().unwrap();
    assert!(registry.entity("authors").is_ok());
    assert_eq!(registry.keys().count(), 4);
}

#[test]
fn reregistering_replaces_the_declaration() {
    let mut registry = library_registry();
    registry.register("people", rel("friends", has_many("people")), None).unwrap();
    assert!(registry.config("people").unwrap().relations.contains_key("friends"));
}

#[test]
fn register_entity_accepts_a_full_config() {
    let mut registry = EntityRegistry::new();
    registry
        .register_entity(
            EntityConfig::new("books")
                .options(EntityOptions::default().with_id_attribute("bookId")),
        )
        .unwrap();
    registry.init().unwrap();
    assert_eq!(registry.entity("books").unwrap().id_attribute(), "bookId");
    assert!(registry.schema().contains("books"));
}

#[test]
fn all_reducers_work_without_init() {
    let mut registry = EntityRegistry::new();
    registry.register("book", Relations::new(), None).unwrap();
    registry.register("author", Relations::new(), None).unwrap();

    let reducers = registry.all_reducers();
    assert_eq!(reducers.len(), 2);

    let book = reducers.get("book").unwrap();
    let state = Arc::new(BTreeMap::from([(
        RecordId::from("a"),
        Arc::new(json!({ "id": "a" })),
    )]));
    let foreign = EntityAction::Other { action_type: "SOMETHING_ELSE".to_string() };
    assert!(Arc::ptr_eq(&state, &book.reduce(Some(&state), &foreign)));
}

#[test]
fn entity_actions_round_trip_through_reducers() {
    let mut registry = EntityRegistry::new();
    registry
        .register(
            "books",
            Relations::new(),
            Some(EntityOptions::default().with_id_attribute("bookId")),
        )
        .unwrap();
    registry.init().unwrap();
    let books = registry.entity("books").unwrap();
    let reducer = books.reducer();

    let merge = books.merge(BTreeMap::from([(
        RecordId::from(1),
        json!({ "bookId": 1, "title": "Dune", "requested_at": 2 }),
    )]));
    let state = reducer.reduce(None, &merge);
    assert_eq!(state.len(), 1);

    // Stale under the books id attribute: rejected, not skipped as malformed.
    let stale = books.update(BTreeMap::from([(
        RecordId::from(1),
        json!({ "bookId": 1, "title": "Old", "requested_at": 1 }),
    )]));
    assert!(Arc::ptr_eq(&state, &reducer.reduce(Some(&state), &stale)));

    let replaced = reducer.reduce(
        Some(&state),
        &books.replace(BTreeMap::from([(
            RecordId::from(1),
            json!({ "bookId": 1, "title": "Old", "requested_at": 1 }),
        )])),
    );
    assert_eq!(replaced[&RecordId::from(1)]["title"], json!("Old"));

    let removed = reducer.reduce(Some(&replaced), &books.remove(vec![RecordId::from(1)]));
    assert!(removed.is_empty());

    let reset = reducer.reduce(
        Some(&removed),
        &books.reset(BTreeMap::from([(RecordId::from(2), json!({ "bookId": 2 }))])),
    );
    assert_eq!(reset.len(), 1);
}

#[test]
fn extractor_from_entity_tracks_its_closure() {
    let mut registry = library_registry();
    registry.init().unwrap();
    let mut extractor = registry.entity("books").unwrap().extractor();

    let store = EntityStore::from_value(&json!({
        "books": { "1": { "id": 1, "library": 1 } },
        "libraries": { "1": { "id": 1, "books": [1] } },
        "people": { "1": { "id": 1 } }
    }))
    .unwrap();
    let first = extractor.extract(&store);
    assert_eq!(first.len(), 2);

    let reducers = registry.all_reducers();
    let store = Arc::new(store);
    let action = EntityAction::from_value(&json!({
        "type": "MERGE_ENTITIES",
        "entities": { "people": { "2": { "id": 2 } } }
    }))
    .unwrap();
    let next = reducers.reduce(&store, &action);
    assert!(!Arc::ptr_eq(&store, &next));
    assert!(Arc::ptr_eq(&first, &extractor.extract(&next)));

    let action = EntityAction::from_value(&json!({
        "type": "MERGE_ENTITIES",
        "entities": { "libraries": { "2": { "id": 2, "books": [] } } }
    }))
    .unwrap();
    let next = reducers.reduce(&next, &action);
    let second = extractor.extract(&next);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.slice("libraries").unwrap().len(), 2);
}

#[test]
fn normalize_and_denormalize_through_the_registry() {
    let mut registry = EntityRegistry::new();
    registry.register("book", rel("author", has_one("author")), None).unwrap();
    registry.register("author", Relations::new(), None).unwrap();
    registry.init().unwrap();

    let data = json!([{ "id": 1, "name": "Book1", "author": { "id": 1, "name": "Author1" } }]);
    let normalized = registry.normalize("book", &data).unwrap();
    assert_eq!(normalized.result, json!([1]));

    let store = EntityStore::from_entities(normalized.entities);
    assert_eq!(
        registry.denormalize("book", &store, Some(&[RecordId::from(1)][..])).unwrap(),
        data
    );
}
