pub mod routes;
pub mod version;

use indexmap::IndexMap;
use log::debug;

use crate::config::TransformOptions;
use crate::context::Context;
use crate::emit::Emitter;
use crate::error::TransformError;
use crate::output::{Output, Section};
use crate::parse;
use crate::parse::document::{Document, OpenApiVersion};
use crate::parse::schema::SchemaOrRef;
use crate::registry::{OperationRegistry, OperationSummary, PathScope};

/// Transform a decoded tree. With `raw_schema` set the tree is read as a
/// flat schema map; otherwise it must be a full document.
pub fn transform_value<E: Emitter + ?Sized>(
    value: serde_json::Value,
    options: &TransformOptions,
    emitter: &E,
) -> Result<Output, TransformError> {
    if options.raw_schema {
        let schemas = parse::schema_map_from_value(value)?;
        let version = options.version.unwrap_or(OpenApiVersion::V3);
        return transform_raw_schema(&schemas, version, options, emitter);
    }
    let document = parse::from_value(value, options.version)?;
    transform(&document, options, emitter)
}

/// Raw-schema mode: render a flat schema map as a single section,
/// `definitions` for version 2 and `schemas` for version 3.
pub fn transform_raw_schema<E: Emitter + ?Sized>(
    schemas: &IndexMap<String, SchemaOrRef>,
    version: OpenApiVersion,
    options: &TransformOptions,
    emitter: &E,
) -> Result<Output, TransformError> {
    let ctx = Context::new(options, version).with_required(schemas.keys().cloned());
    let section = match version {
        OpenApiVersion::V2 => Section::Definitions,
        OpenApiVersion::V3 => Section::Schemas,
    };
    debug!("raw schema mode: {} schemas into {section}", schemas.len());

    let mut output = Output::new();
    output.set(section, emitter.schema_map(schemas, &ctx)?);
    Ok(output.trimmed())
}

/// Transform a full document into its output sections.
///
/// Paths (and webhooks) are rendered first and fill the operation registry;
/// the version-specific sections follow; the registry is then sealed and
/// the route contract sections are derived from it. `options.raw_schema`
/// has no effect here: a typed document is always transformed in full.
pub fn transform<E: Emitter + ?Sized>(
    document: &Document,
    options: &TransformOptions,
    emitter: &E,
) -> Result<Output, TransformError> {
    transform_with_operations(document, options, emitter).map(|(output, _)| output)
}

/// [`transform`], also returning what the operation registry held once
/// the paths were rendered.
pub fn transform_with_operations<E: Emitter + ?Sized>(
    document: &Document,
    options: &TransformOptions,
    emitter: &E,
) -> Result<(Output, Vec<OperationSummary>), TransformError> {
    let ctx = Context::new(options, document.version());
    let paths_ctx = ctx.with_global_parameters(document.global_parameters());
    let mut registry = OperationRegistry::new();
    let mut output = Output::new();

    output.open(Section::Paths);
    if let Some(paths) = document.paths() {
        debug!("transforming {} paths", paths.len());
        let text = emitter.paths(paths, &paths_ctx, &mut registry)?;
        output.append(Section::Paths, &text);
    }

    output.open(Section::Webhooks);
    if let Some(webhooks) = document.webhooks() {
        debug!("transforming {} webhooks", webhooks.len());
        let hooks_ctx = paths_ctx.with_scope(PathScope::Webhooks);
        let text = emitter.paths(webhooks, &hooks_ctx, &mut registry)?;
        output.append(Section::Webhooks, &text);
    }

    version::transform_version_sections(document, &ctx, emitter, &mut output)?;

    let index = registry.seal();
    routes::transform_route_contracts(&index, &paths_ctx, emitter, &mut output)?;

    Ok((output.trimmed(), index.summaries()))
}
