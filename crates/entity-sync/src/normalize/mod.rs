//! Reference implementation of the normalization boundary.

pub mod tree_normalizer;

pub use tree_normalizer::TreeNormalizer;
