use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

/// One recorded patch session: a document, the operations a client sent,
/// and either the resulting document or a fragment of the error message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCase {
    pub test_id: String,
    pub original_doc: Map<String, Value>,
    pub operations: Vec<Value>,
    #[serde(default)]
    pub expected_doc: Option<Map<String, Value>>,
    #[serde(default)]
    pub expected_error: Option<String>,
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn load_cases(name: &str) -> Vec<FixtureCase> {
    let path = fixtures_dir().join(name);
    let data = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}
