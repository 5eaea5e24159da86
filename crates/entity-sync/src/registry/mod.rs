//! Entity registration and per-type handles.

pub mod controller;
pub mod entity;

pub use controller::EntityRegistry;
pub use entity::Entity;
