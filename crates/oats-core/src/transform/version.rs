use indexmap::IndexMap;
use log::debug;

use crate::context::Context;
use crate::emit::Emitter;
use crate::error::TransformError;
use crate::fragment::{Entry, Fragment};
use crate::output::{Output, Section};
use crate::parse::components::Components;
use crate::parse::document::{Document, DocumentV2};
use crate::parse::parameter::ParameterOrRef;
use crate::parse::schema::SchemaOrRef;

/// Fill the sections whose shape depends on the document version.
pub fn transform_version_sections<E: Emitter + ?Sized>(
    document: &Document,
    ctx: &Context<'_>,
    emitter: &E,
    output: &mut Output,
) -> Result<(), TransformError> {
    match document {
        Document::V2(doc) => transform_v2(doc, ctx, emitter, output),
        Document::V3(doc) => {
            output.open(Section::Components);
            if let Some(ref components) = doc.components {
                let text = transform_components(components, ctx, emitter)?;
                output.set(Section::Components, text);
            }
            Ok(())
        }
    }
}

/// `#/definitions`, `#/parameters` and `#/responses`.
fn transform_v2<E: Emitter + ?Sized>(
    doc: &DocumentV2,
    ctx: &Context<'_>,
    emitter: &E,
    output: &mut Output,
) -> Result<(), TransformError> {
    output.open(Section::Definitions);
    if let Some(ref definitions) = doc.definitions {
        debug!("transforming {} definitions", definitions.len());
        let def_ctx = ctx.with_required(definitions.keys().cloned());
        output.set(Section::Definitions, emitter.schema_map(definitions, &def_ctx)?);
    }

    output.open(Section::Parameters);
    if let Some(ref parameters) = doc.parameters {
        debug!("transforming {} parameters", parameters.len());
        let param_ctx = ctx.with_required(parameters.keys().cloned());
        let schemas = parameters_as_schemas(parameters);
        output.set(Section::Parameters, emitter.schema_map(&schemas, &param_ctx)?);
    }

    output.open(Section::Responses);
    if let Some(ref responses) = doc.responses {
        debug!("transforming {} responses", responses.len());
        output.set(Section::Responses, emitter.responses(responses, ctx)?);
    }

    Ok(())
}

/// `#/components`, one container block per present collection, in fixed
/// order: schemas, responses, parameters, requestBodies, headers.
fn transform_components<E: Emitter + ?Sized>(
    components: &Components,
    ctx: &Context<'_>,
    emitter: &E,
) -> Result<String, TransformError> {
    let mut fragment = Fragment::new(ctx.immutable_types);

    if let Some(ref schemas) = components.schemas {
        let schema_ctx = ctx.with_required(schemas.keys().cloned());
        fragment.push(Entry::block("schemas", emitter.schema_map(schemas, &schema_ctx)?));
    }
    if let Some(ref responses) = components.responses {
        fragment.push(Entry::block("responses", emitter.responses(responses, ctx)?));
    }
    if let Some(ref parameters) = components.parameters {
        let param_ctx = ctx.with_required(parameters.keys().cloned());
        let schemas = parameters_as_schemas(parameters);
        fragment.push(Entry::block("parameters", emitter.schema_map(&schemas, &param_ctx)?));
    }
    if let Some(ref request_bodies) = components.request_bodies {
        fragment.push(Entry::block(
            "requestBodies",
            emitter.request_bodies(request_bodies, ctx)?,
        ));
    }
    if let Some(ref headers) = components.headers {
        let header_ctx = ctx.with_required(std::iter::empty::<String>());
        fragment.push(Entry::block("headers", emitter.headers(headers, &header_ctx)?));
    }

    debug!("components: {} collections", fragment.len());
    Ok(fragment.render())
}

/// Parameter maps go through the schema-map emitter as their value types.
fn parameters_as_schemas(
    parameters: &IndexMap<String, ParameterOrRef>,
) -> IndexMap<String, SchemaOrRef> {
    parameters
        .iter()
        .map(|(name, param)| (name.clone(), param.value_schema()))
        .collect()
}
