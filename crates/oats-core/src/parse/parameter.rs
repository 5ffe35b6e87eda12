use serde::{Deserialize, Serialize};

use super::schema::{Schema, SchemaOrRef, TypeSet};

/// Parameter location. `body` and `formData` only appear in Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
    FormData,
}

impl ParameterLocation {
    /// Order in which locations are rendered inside an operation.
    pub const ALL: [ParameterLocation; 6] = [
        ParameterLocation::Path,
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Cookie,
        ParameterLocation::Body,
        ParameterLocation::FormData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
        }
    }
}

/// An API parameter. OpenAPI 3 puts the type under `schema`; Swagger 2.0
/// non-body parameters carry `type`/`format`/`items`/`enum` inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Parameter {
    /// The schema describing this parameter's value, whichever way the
    /// document spelled it.
    pub fn value_schema(&self) -> SchemaOrRef {
        if let Some(ref schema) = self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.param_type.clone(),
            format: self.format.clone(),
            description: self.description.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            ..Schema::default()
        }
        .into()
    }

    /// Path parameters are always required, regardless of the flag.
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Path
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}

impl ParameterOrRef {
    /// Render the parameter map entry as a schema, keeping references intact.
    pub fn value_schema(&self) -> SchemaOrRef {
        match self {
            ParameterOrRef::Ref { ref_path } => SchemaOrRef::Ref {
                ref_path: ref_path.clone(),
            },
            ParameterOrRef::Parameter(p) => p.value_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::schema::SchemaType;

    #[test]
    fn test_inline_v2_parameter_becomes_schema() {
        let p: Parameter = serde_json::from_value(serde_json::json!({
            "name": "limit",
            "in": "query",
            "type": "integer",
            "description": "page size"
        }))
        .unwrap();
        match p.value_schema() {
            SchemaOrRef::Schema(s) => {
                assert_eq!(s.schema_type, Some(TypeSet::Single(SchemaType::Integer)));
                assert_eq!(s.description.as_deref(), Some("page size"));
            }
            _ => panic!("expected inline schema"),
        }
        assert!(!p.is_required());
    }

    #[test]
    fn test_path_parameter_always_required() {
        let p: Parameter = serde_json::from_value(serde_json::json!({
            "name": "petId",
            "in": "path",
            "schema": { "type": "string" }
        }))
        .unwrap();
        assert!(p.is_required());
    }

    #[test]
    fn test_form_data_location() {
        let p: Parameter = serde_json::from_value(serde_json::json!({
            "name": "upload",
            "in": "formData",
            "type": "file"
        }))
        .unwrap();
        assert_eq!(p.location, ParameterLocation::FormData);
        assert_eq!(p.location.as_str(), "formData");
    }
}
