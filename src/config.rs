//! Engine configuration, loadable from a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Fields that may be requested through `select(...)` on top of `*`.
pub const DEFAULT_INCLUDE_FIELDS: [&str; 6] = [
    "transcripts",
    "consequences",
    "occurrences",
    "specimen",
    "observation",
    "projects",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Projection allow-list for `customSelects`.
    pub include_fields: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_fields: DEFAULT_INCLUDE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn new(include_fields: Vec<String>) -> Self {
        Self { include_fields }
    }

    /// Loads the configuration from a JSON file such as
    /// `{"includeFields": ["transcripts", "occurrences"]}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let display = path_ref.display().to_string();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound(display));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: display,
            source,
        })
    }

    /// Whether `field` may appear in `customSelects`. `*` never may.
    pub fn allows(&self, field: &str) -> bool {
        field != "*" && self.include_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_load_valid_json_config() {
        let path = temp_path("pql_config.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"includeFields": ["transcripts", "donors", "*"]}}"#).unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert!(config.allows("transcripts"));
        assert!(config.allows("donors"));
        assert!(!config.allows("*"));
        assert!(!config.allows("occurrences"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        let path = temp_path("pql_invalid.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = EngineConfig::from_json_file(&path);
        assert!(matches!(result, Err(ConfigError::Json { .. })));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::from_json_file("non_existent_pql_config.json");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        for field in DEFAULT_INCLUDE_FIELDS {
            assert!(config.allows(field));
        }
        assert!(!config.allows("bar"));
        assert!(!config.allows("*"));
    }
}
