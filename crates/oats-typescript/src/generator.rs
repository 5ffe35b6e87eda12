use log::info;
use oats_core::registry::OperationSummary;
use oats_core::{Document, Output, TransformOptions, transform, transform_value, transform_with_operations};

use crate::emitter::TypeScriptEmitter;
use crate::error::GenerateError;
use crate::module::render_module;

/// Transform a decoded tree with the TypeScript emitters.
pub fn generate_sections(
    value: serde_json::Value,
    options: &TransformOptions,
) -> Result<Output, GenerateError> {
    Ok(transform_value(value, options, &TypeScriptEmitter)?)
}

/// Transform a decoded tree and render it as one `.ts` module.
pub fn generate_module(
    value: serde_json::Value,
    options: &TransformOptions,
) -> Result<String, GenerateError> {
    let title = value
        .pointer("/info/title")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let output = generate_sections(value, options)?;
    info!("generated {} sections", output.len());
    Ok(render_module(&output, title.as_deref())?)
}

/// Render an already-typed document.
pub fn generate_document(
    document: &Document,
    options: &TransformOptions,
) -> Result<String, GenerateError> {
    let output = transform(document, options, &TypeScriptEmitter)?;
    let title = document.info().map(|i| i.title.as_str()).filter(|t| !t.is_empty());
    Ok(render_module(&output, title)?)
}

/// Sections of an already-typed document together with the operations
/// they were built from.
pub fn generate_document_sections(
    document: &Document,
    options: &TransformOptions,
) -> Result<(Output, Vec<OperationSummary>), GenerateError> {
    Ok(transform_with_operations(document, options, &TypeScriptEmitter)?)
}
