use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

use crate::parse::document::OpenApiVersion;

/// Options recognized by the transform engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Force a document shape instead of reading `swagger`/`openapi`.
    /// Raw-schema mode falls back to 3 when unset.
    pub version: Option<OpenApiVersion>,
    /// Emit `readonly` modifiers on generated members.
    pub immutable_types: bool,
    /// Treat the whole input as a flat map of schema objects.
    pub raw_schema: bool,
}

/// Top-level project configuration loaded from `.oats.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OatsConfig {
    pub input: String,
    pub output: String,
    pub options: TransformOptions,
}

impl Default for OatsConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/generated/schema.ts".to_string(),
            options: TransformOptions::default(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oats.yaml";

/// Read `.oats.yaml`-style config at `path`. A missing file is not an
/// error; the caller falls back to [`OatsConfig::default`].
pub fn load_config(path: &Path) -> Result<Option<OatsConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_yaml_ng::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oats configuration
input: openapi.yaml
output: src/generated/schema.ts

options:
  # version: 3            # 2 | 3, detected from the document when omitted
  immutable_types: false  # mark generated members readonly
  raw_schema: false       # input is a flat map of schema objects
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OatsConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.output, "src/generated/schema.ts");
        assert_eq!(config.options, TransformOptions::default());
        assert!(config.options.version.is_none());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: petstore.json
output: types/petstore.ts
options:
  version: 2
  immutable_types: true
  raw_schema: true
"#;
        let config: OatsConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "petstore.json");
        assert_eq!(config.output, "types/petstore.ts");
        assert_eq!(config.options.version, Some(OpenApiVersion::V2));
        assert!(config.options.immutable_types);
        assert!(config.options.raw_schema);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: OatsConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.output, "src/generated/schema.ts");
        assert!(!config.options.immutable_types);
    }

    #[test]
    fn test_reject_unknown_version() {
        let yaml = "options:\n  version: 4\n";
        assert!(serde_yaml_ng::from_str::<OatsConfig>(yaml).is_err());
    }

    #[test]
    fn test_default_content_parses() {
        let config: OatsConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "openapi.yaml");
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        fs::write(&path, "output: out.ts\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.output, "out.ts");

        fs::write(&path, "options: [1, 2]\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
