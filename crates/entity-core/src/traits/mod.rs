//! Seams to external collaborators.

pub mod normalizer;

pub use normalizer::{Normalized, Normalizer};
