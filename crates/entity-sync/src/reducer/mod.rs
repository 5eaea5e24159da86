//! Reducer composition.
//!
//! One reducer per record type, each a total function over
//! `(state, action)`. Merge and update pass through the diff gate;
//! replace, reset and remove are authoritative and bypass it.

pub mod action;
pub mod entity_reducer;
pub mod list_splice;
pub mod reducer_map;

pub use action::{
    create_action, merge_entities, remove_entities, replace_entities, reset_entities,
    update_entities, EntityAction,
};
pub use entity_reducer::EntityReducer;
pub use list_splice::{
    remove_object_in_slice, remove_object_in_slice_by, replace_object_in_slice,
    replace_object_in_slice_by,
};
pub use reducer_map::EntityReducers;
