use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use entity_core::{has_many, has_one, EntityStore, EntityTable, NormalizedEntities, RecordId};
use entity_sync::{apply_write_set, compile_relation_keys, diff_merge, EntityExtractor, RelationSchema};
use proptest::prelude::*;
use serde_json::{json, Value};

fn record(id: u64, requested_at: i64, colors: Option<&str>, tags: Vec<u8>) -> Value {
    let mut record = json!({ "id": id, "requested_at": requested_at, "tags": tags });
    if let Some(colors) = colors {
        record["colors"] = json!(colors);
    }
    record
}

fn table_strategy() -> impl Strategy<Value = BTreeMap<RecordId, Value>> {
    prop::collection::btree_map(
        0u64..6,
        (
            0i64..5,
            prop::option::of(prop::sample::select(vec!["red", "blue"])),
            prop::collection::vec(0u8..3, 0..3),
        ),
        0..5,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, (at, colors, tags))| (RecordId::from(id), record(id, at, colors, tags)))
            .collect()
    })
}

fn entities_strategy() -> impl Strategy<Value = NormalizedEntities> {
    prop::collection::btree_map(
        prop::sample::select(vec!["pencils", "erasers"]).prop_map(String::from),
        table_strategy(),
        0..3,
    )
}

fn marker(record: &Value) -> i64 {
    record["requested_at"].as_i64().unwrap_or_default()
}

/// Naive fixpoint reachability over `edges`.
fn reachable(root: usize, edges: &[(usize, usize)]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::from([root]);
    loop {
        let before = seen.len();
        for (from, to) in edges {
            if seen.contains(from) {
                seen.insert(*to);
            }
        }
        if seen.len() == before {
            return seen;
        }
    }
}

proptest! {
    #[test]
    fn applied_write_set_is_idempotent(current in entities_strategy(), incoming in entities_strategy()) {
        let store = EntityStore::from_entities(current);
        if let Some(write_set) = diff_merge(&incoming, &store).into_write_set() {
            let after = apply_write_set(&store, &write_set);
            prop_assert!(diff_merge(&write_set.clone().into_entities(), &after).is_no_change());
            prop_assert!(diff_merge(&incoming, &after).is_no_change());
        }
    }

    #[test]
    fn stale_records_never_written(current in entities_strategy(), incoming in entities_strategy()) {
        let store = EntityStore::from_entities(current);
        let outcome = diff_merge(&incoming, &store);
        let Some(write_set) = outcome.write_set() else {
            return Ok(());
        };
        for (key, records) in &incoming {
            for (id, record) in records {
                if let Some(existing) = store.record(key, id) {
                    if marker(record) < marker(existing) {
                        prop_assert!(!write_set.contains(key, id), "stale {key}/{id} written");
                    }
                }
            }
        }
    }

    #[test]
    fn written_records_are_whole(current in entities_strategy(), incoming in entities_strategy()) {
        let store = EntityStore::from_entities(current);
        match diff_merge(&incoming, &store).into_write_set() {
            Some(write_set) => {
                prop_assert!(!write_set.is_empty());
                for (key, records) in write_set.iter() {
                    prop_assert!(!records.is_empty());
                    for (id, record) in records {
                        prop_assert_eq!(record, &incoming[key][id]);
                    }
                }
            }
            None => {
                // Nothing new, nothing changed.
                for (key, records) in &incoming {
                    for id in records.keys() {
                        prop_assert!(store.record(key, id).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn closure_is_exactly_the_reachable_set(
        types in 1usize..7,
        raw_edges in prop::collection::vec((0usize..7, 0usize..7, any::<bool>()), 0..14),
        root in 0usize..7,
    ) {
        let root = root % types;
        let edges: Vec<(usize, usize, bool)> = raw_edges
            .into_iter()
            .map(|(from, to, many)| (from % types, to % types, many))
            .collect();

        let mut schema = RelationSchema::new();
        for t in 0..types {
            let relations = edges
                .iter()
                .enumerate()
                .filter(|(_, (from, _, _))| *from == t)
                .map(|(i, (_, to, many))| {
                    let target = format!("t{to}");
                    let relation = if *many { has_many(target) } else { has_one(target) };
                    (format!("f{i}"), relation)
                })
                .collect();
            schema.insert(format!("t{t}"), relations);
        }

        let keys = compile_relation_keys(&schema, &format!("t{root}")).unwrap();
        let plain: Vec<(usize, usize)> = edges.iter().map(|(from, to, _)| (*from, *to)).collect();
        let expected: BTreeSet<String> = reachable(root, &plain)
            .into_iter()
            .map(|t| format!("t{t}"))
            .collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn extractor_recomputes_only_for_tracked_slices(
        tracked in prop::collection::btree_set(0usize..4, 1..4),
        replacements in prop::collection::vec(0usize..4, 1..12),
    ) {
        let name = |i: usize| format!("s{i}");
        let mut store = EntityStore::from_slices(
            (0..4).map(|i| (name(i), Arc::new(EntityTable::new()))),
        );
        let mut extractor = EntityExtractor::new("s0", tracked.iter().map(|i| name(*i)));
        let mut previous = extractor.extract(&store);

        for replaced in replacements {
            store = store.with_slice(name(replaced), Arc::new(EntityTable::new()));
            let next = extractor.extract(&store);
            prop_assert_eq!(Arc::ptr_eq(&previous, &next), !tracked.contains(&replaced));
            previous = next;
        }
    }
}
