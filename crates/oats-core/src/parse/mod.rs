pub mod components;
pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ParseError;
use document::{Document, DocumentV2, DocumentV3, OpenApiVersion};
use schema::SchemaOrRef;

/// Decode YAML text into a generic tree. Scalar mapping keys such as an
/// unquoted `200:` status code become strings.
pub fn value_from_yaml(input: &str) -> Result<Value, ParseError> {
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    Ok(yaml_to_json(yaml))
}

fn yaml_to_json(yaml: serde_yaml_ng::Value) -> Value {
    use serde_yaml_ng::Value as Yaml;

    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64().map(Value::from).unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (mapping_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn mapping_key(key: serde_yaml_ng::Value) -> String {
    match key {
        serde_yaml_ng::Value::String(s) => s,
        serde_yaml_ng::Value::Null => "null".to_string(),
        other => version_tag(&yaml_to_json(other)),
    }
}

/// Decode JSON text into a generic tree.
pub fn value_from_json(input: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse a document from YAML, detecting its version.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    from_value(value_from_yaml(input)?, None)
}

/// Parse a document from JSON, detecting its version.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    from_value(value_from_json(input)?, None)
}

/// Build a typed document from a decoded tree. An explicit `version` wins
/// over the `swagger`/`openapi` tag.
pub fn from_value(value: Value, version: Option<OpenApiVersion>) -> Result<Document, ParseError> {
    if !value.is_object() {
        return Err(ParseError::NotAMapping);
    }
    let version = match version {
        Some(v) => v,
        None => detect_version(&value)?,
    };
    let document = match version {
        OpenApiVersion::V2 => Document::V2(serde_json::from_value::<DocumentV2>(value)?),
        OpenApiVersion::V3 => Document::V3(serde_json::from_value::<DocumentV3>(value)?),
    };
    Ok(document)
}

/// Read the version tag at the document root.
pub fn detect_version(value: &Value) -> Result<OpenApiVersion, ParseError> {
    if let Some(tag) = value.get("openapi") {
        let tag = version_tag(tag);
        return if tag.starts_with("3.") || tag == "3" {
            Ok(OpenApiVersion::V3)
        } else {
            Err(ParseError::UnsupportedVersion(tag))
        };
    }
    if let Some(tag) = value.get("swagger") {
        let tag = version_tag(tag);
        return if tag.starts_with("2.") || tag == "2" {
            Ok(OpenApiVersion::V2)
        } else {
            Err(ParseError::UnsupportedVersion(tag))
        };
    }
    Err(ParseError::MissingVersion)
}

/// Unquoted YAML versions (`openapi: 3.0`) decode as numbers.
fn version_tag(tag: &Value) -> String {
    match tag {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a flat map of schema objects, as used by raw-schema mode.
pub fn schema_map_from_value(value: Value) -> Result<IndexMap<String, SchemaOrRef>, ParseError> {
    if !value.is_object() {
        return Err(ParseError::NotAMapping);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_v2() {
        let v = json!({ "swagger": "2.0" });
        assert_eq!(detect_version(&v).unwrap(), OpenApiVersion::V2);
    }

    #[test]
    fn test_detect_v3_numeric_tag() {
        let v = value_from_yaml("openapi: 3.0\n").unwrap();
        assert_eq!(detect_version(&v).unwrap(), OpenApiVersion::V3);
    }

    #[test]
    fn test_detect_unsupported() {
        let v = json!({ "openapi": "4.0.0" });
        assert!(matches!(
            detect_version(&v),
            Err(ParseError::UnsupportedVersion(tag)) if tag == "4.0.0"
        ));
    }

    #[test]
    fn test_detect_missing() {
        let v = json!({ "paths": {} });
        assert!(matches!(detect_version(&v), Err(ParseError::MissingVersion)));
    }

    #[test]
    fn test_explicit_version_overrides_tag() {
        let v = json!({ "openapi": "3.1.0", "definitions": { "A": { "type": "string" } } });
        let doc = from_value(v, Some(OpenApiVersion::V2)).unwrap();
        match doc {
            Document::V2(d) => assert_eq!(d.definitions.unwrap().len(), 1),
            Document::V3(_) => panic!("expected a v2 document"),
        }
    }

    #[test]
    fn test_yaml_numeric_keys_become_strings() {
        let v = value_from_yaml("responses:\n  200:\n    description: ok\n").unwrap();
        assert_eq!(v["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(matches!(
            from_value(json!([1, 2]), None),
            Err(ParseError::NotAMapping)
        ));
    }
}
