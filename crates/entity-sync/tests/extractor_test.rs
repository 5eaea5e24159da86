use std::collections::BTreeMap;
use std::sync::Arc;

use entity_core::{has_many, has_one, EntityStore, EntityTable, RecordId, Relations};
use entity_sync::{make_extractor, EntityExtractor, RelationSchema};
use serde_json::json;

fn table(records: &[(u64, serde_json::Value)]) -> Arc<EntityTable> {
    Arc::new(
        records
            .iter()
            .map(|(id, record)| (RecordId::from(*id), Arc::new(record.clone())))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn schema() -> RelationSchema {
    let mut schema = RelationSchema::new();
    schema.insert(
        "books",
        Relations::from([
            ("library".to_string(), has_one("libraries")),
            ("author".to_string(), has_one("authors")),
        ]),
    );
    schema.insert(
        "libraries",
        Relations::from([("books".to_string(), has_many("books"))]),
    );
    schema.insert(
        "authors",
        Relations::from([("books".to_string(), has_many("books"))]),
    );
    schema.insert("people", Relations::new());
    schema
}

fn initial_store() -> EntityStore {
    EntityStore::from_slices([
        ("books".to_string(), table(&[(1, json!({ "id": 1, "library": 1, "author": 1 }))])),
        ("libraries".to_string(), table(&[(1, json!({ "id": 1, "books": [1] }))])),
        ("authors".to_string(), table(&[(1, json!({ "id": 1, "books": [1] }))])),
        ("people".to_string(), table(&[(1, json!({ "id": 1 }))])),
    ])
}

#[test]
fn memoizes_on_slice_identity() {
    let mut extractor = make_extractor(&schema(), "books").unwrap();
    assert_eq!(extractor.dependency_keys(), ["authors", "books", "libraries"]);

    let store = initial_store();
    let first = extractor.extract(&store);
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["authors", "books", "libraries"]);
    assert!(!first.contains("people"));

    // Unrelated slice replaced: cached projection comes back.
    let store = store.with_slice("people", table(&[(2, json!({ "id": 2 }))]));
    let second = extractor.extract(&store);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(extractor.recomputations(), 1);

    // Tracked slice replaced: new projection.
    let store = store.with_slice("libraries", table(&[(2, json!({ "id": 2, "books": [] }))]));
    let third = extractor.extract(&store);
    assert!(!Arc::ptr_eq(&second, &third));
    assert_eq!(extractor.recomputations(), 2);
    assert!(Arc::ptr_eq(
        third.slice("libraries").unwrap(),
        store.slice("libraries").unwrap()
    ));

    // Same store again: memoized.
    let fourth = extractor.extract(&store);
    assert!(Arc::ptr_eq(&third, &fourth));
    assert_eq!(extractor.recomputations(), 2);
}

#[test]
fn projection_shares_slices_with_the_store() {
    let mut extractor = make_extractor(&schema(), "books").unwrap();
    let store = initial_store();
    let projection = extractor.extract(&store);
    for key in ["authors", "books", "libraries"] {
        assert!(Arc::ptr_eq(
            projection.slice(key).unwrap(),
            store.slice(key).unwrap()
        ));
    }
}

#[test]
fn missing_slices_appear_empty() {
    let mut extractor = EntityExtractor::new("books", ["books", "authors"]);
    let projection = extractor.extract(&EntityStore::new());
    assert_eq!(projection.len(), 2);
    assert!(projection.slice("authors").unwrap().is_empty());

    // Still missing: still memoized.
    let again = extractor.extract(&EntityStore::new());
    assert!(Arc::ptr_eq(&projection, &again));
}

#[test]
fn slice_appearing_is_a_change() {
    let mut extractor = EntityExtractor::new("books", ["books"]);
    let empty = extractor.extract(&EntityStore::new());
    let store = EntityStore::new().with_slice("books", table(&[(1, json!({ "id": 1 }))]));
    let filled = extractor.extract(&store);
    assert!(!Arc::ptr_eq(&empty, &filled));
    assert_eq!(filled.record_count(), 1);
}

#[test]
fn equal_but_distinct_slices_recompute() {
    let mut extractor = EntityExtractor::new("people", ["people"]);
    let store = EntityStore::new().with_slice("people", table(&[(1, json!({ "id": 1 }))]));
    let first = extractor.extract(&store);
    let copy = store.with_slice("people", table(&[(1, json!({ "id": 1 }))]));
    let second = extractor.extract(&copy);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
}

#[test]
fn invalidate_forces_recompute() {
    let mut extractor = EntityExtractor::new("people", ["people"]);
    let store = initial_store();
    let first = extractor.extract(&store);
    extractor.invalidate();
    let second = extractor.extract(&store);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(extractor.recomputations(), 2);
}

#[test]
fn extractors_are_independent() {
    let schema = schema();
    let mut books = make_extractor(&schema, "books").unwrap();
    let mut people = make_extractor(&schema, "people").unwrap();
    assert_eq!(people.root(), "people");

    let store = initial_store();
    books.extract(&store);
    people.extract(&store);

    let store = store.with_slice("books", table(&[]));
    books.extract(&store);
    people.extract(&store);
    assert_eq!(books.recomputations(), 2);
    assert_eq!(people.recomputations(), 1);
}

#[test]
fn unknown_root_fails() {
    assert!(make_extractor(&schema(), "shelves").is_err());
}
