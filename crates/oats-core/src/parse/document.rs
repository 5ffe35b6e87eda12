use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::PathItem;
use super::parameter::ParameterOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;

/// Major version of the document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OpenApiVersion {
    /// Swagger 2.0: flat `definitions`, `parameters`, `responses`.
    V2,
    /// OpenAPI 3.x: everything reusable lives under `components`.
    V3,
}

impl TryFrom<u8> for OpenApiVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(OpenApiVersion::V2),
            3 => Ok(OpenApiVersion::V3),
            other => Err(format!("unsupported OpenAPI major version {other}")),
        }
    }
}

impl From<OpenApiVersion> for u8 {
    fn from(version: OpenApiVersion) -> Self {
        match version {
            OpenApiVersion::V2 => 2,
            OpenApiVersion::V3 => 3,
        }
    }
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentV2 {
    #[serde(default)]
    pub swagger: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, PathItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, SchemaOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, ParameterOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, ResponseOrRef>>,
}

/// OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentV3 {
    #[serde(default)]
    pub openapi: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, PathItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<IndexMap<String, PathItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// A decoded API description, one variant per document shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    V2(DocumentV2),
    V3(DocumentV3),
}

impl Document {
    pub fn version(&self) -> OpenApiVersion {
        match self {
            Document::V2(_) => OpenApiVersion::V2,
            Document::V3(_) => OpenApiVersion::V3,
        }
    }

    pub fn info(&self) -> Option<&Info> {
        match self {
            Document::V2(doc) => doc.info.as_ref(),
            Document::V3(doc) => doc.info.as_ref(),
        }
    }

    pub fn paths(&self) -> Option<&IndexMap<String, PathItem>> {
        match self {
            Document::V2(doc) => doc.paths.as_ref(),
            Document::V3(doc) => doc.paths.as_ref(),
        }
    }

    /// Webhooks only exist in OpenAPI 3.1 documents.
    pub fn webhooks(&self) -> Option<&IndexMap<String, PathItem>> {
        match self {
            Document::V2(_) => None,
            Document::V3(doc) => doc.webhooks.as_ref(),
        }
    }

    /// The parameter pool that `$ref` parameters resolve against.
    pub fn global_parameters(&self) -> Option<&IndexMap<String, ParameterOrRef>> {
        match self {
            Document::V2(doc) => doc.parameters.as_ref(),
            Document::V3(doc) => doc
                .components
                .as_ref()
                .and_then(|c| c.parameters.as_ref()),
        }
    }
}
