//! Test fixture loader for entity-sync golden datasets.
//!
//! Provides typed deserialization of the fixture JSON files and helper
//! functions for loading them in tests across crates.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// One golden diff scenario: a store, an incoming payload, and the
/// expected write-set (`null` when the merge must be a no-op).
#[derive(Debug, Clone, Deserialize)]
pub struct DiffScenario {
    pub description: String,
    /// `{ type: { id: record } }`
    pub current_state: serde_json::Value,
    /// `{ type: { id: record } }`
    pub incoming: serde_json::Value,
    pub expected: Option<serde_json::Value>,
}

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    files.sort();
    files
}

/// Load every diff scenario under `golden/diff`.
pub fn load_diff_scenarios() -> Vec<(String, DiffScenario)> {
    list_fixtures("golden/diff")
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let relative = format!("golden/diff/{name}.json");
            (name, load_fixture(&relative))
        })
        .collect()
}
