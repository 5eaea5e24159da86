//! Record, store, relation and operation types.

pub mod ids;
pub mod operation;
pub mod relation;
pub mod store;

pub use ids::RecordId;
pub use operation::Operation;
pub use relation::{
    has_many, has_one, Cardinality, EntityConfig, EntityOptions, ProcessStrategy, Relation,
    Relations,
};
pub use store::{EntityStore, EntityTable, NormalizedEntities, Record};
