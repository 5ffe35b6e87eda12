use std::collections::HashSet;

use indexmap::IndexMap;

use crate::config::TransformOptions;
use crate::parse::document::OpenApiVersion;
use crate::parse::operation::PathItem;
use crate::parse::parameter::ParameterOrRef;
use crate::registry::PathScope;

/// Read-only configuration handed to every emitter call.
///
/// Nested transforms derive their own context with the `with_*` methods,
/// which return a modified copy; a sibling holding an earlier context never
/// observes the change. The operation registry is not part of the context;
/// it travels as an explicit `&mut`.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    pub version: OpenApiVersion,
    pub immutable_types: bool,
    /// Keys of the schema map being rendered that must not be optional.
    pub required: HashSet<String>,
    /// Pool that `$ref` parameters resolve against.
    pub global_parameters: Option<&'a IndexMap<String, ParameterOrRef>>,
    /// Owning path item while an operation is rendered.
    pub path_item: Option<&'a PathItem>,
    /// Which top-level map the paths emitter is walking.
    pub scope: PathScope,
}

impl<'a> Context<'a> {
    pub fn new(options: &TransformOptions, version: OpenApiVersion) -> Self {
        Self {
            version,
            immutable_types: options.immutable_types,
            required: HashSet::new(),
            global_parameters: None,
            path_item: None,
            scope: PathScope::Paths,
        }
    }

    pub fn with_required<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: keys.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    pub fn with_global_parameters(
        &self,
        global_parameters: Option<&'a IndexMap<String, ParameterOrRef>>,
    ) -> Self {
        Self {
            global_parameters,
            ..self.clone()
        }
    }

    pub fn with_path_item(&self, path_item: &'a PathItem) -> Self {
        Self {
            path_item: Some(path_item),
            ..self.clone()
        }
    }

    pub fn with_scope(&self, scope: PathScope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    /// The member modifier for generated containers: `"readonly "` or `""`.
    pub fn readonly(&self) -> &'static str {
        if self.immutable_types { "readonly " } else { "" }
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }
}
