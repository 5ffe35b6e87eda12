//! Route contracts: the `operations`, `express` and `handlers` sections,
//! derived from the sealed operation registry.

use log::debug;

use crate::context::Context;
use crate::emit::Emitter;
use crate::error::TransformError;
use crate::fragment::{Entry, Fragment, quote};
use crate::naming::express_route;
use crate::output::{Output, Section};
use crate::registry::{OperationIndex, PathScope};

/// Populate the three route contract sections. They are always opened and
/// stay empty when no operation was registered.
pub fn transform_route_contracts<'a, E: Emitter + ?Sized>(
    index: &OperationIndex<'a>,
    ctx: &Context<'a>,
    emitter: &E,
    output: &mut Output,
) -> Result<(), TransformError> {
    output.open(Section::Operations);
    output.open(Section::Express);
    output.open(Section::Handlers);
    if index.is_empty() {
        return Ok(());
    }

    debug!("generating route contracts for {} operations", index.len());
    output.set(Section::Operations, operations_section(index, ctx, emitter)?);
    output.set(Section::Express, express_section(index, ctx, emitter));
    output.set(Section::Handlers, handlers_section(index, ctx));
    Ok(())
}

/// One `"<id>": { ... }` entry per operation, in discovery order.
fn operations_section<'a, E: Emitter + ?Sized>(
    index: &OperationIndex<'a>,
    ctx: &Context<'a>,
    emitter: &E,
) -> Result<String, TransformError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (id, entry) in index.iter() {
        let op_ctx = ctx.with_path_item(entry.path_item);
        let body = emitter.operation(entry.operation, &op_ctx)?;
        fragment.push(
            Entry::block(quote(id), body).with_doc(entry.operation.description.as_deref()),
        );
    }
    Ok(fragment.render())
}

/// The request/response/handler record of every operation.
fn express_section<'a, E: Emitter + ?Sized>(
    index: &OperationIndex<'a>,
    ctx: &Context<'a>,
    emitter: &E,
) -> String {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (id, entry) in index.iter() {
        let op_ctx = ctx.with_path_item(entry.path_item);
        let op = entry.operation;
        let this = format!("express[{}]", quote(id));

        let responses = emitter
            .response_type(id, op, &op_ctx)
            .unwrap_or_else(|| "never".to_string());
        let request = format!(
            "Request<{}, {this}[\"responses\"], {}, {}>",
            emitter.path_params_type(id, op, &op_ctx),
            emitter.request_type(id, op, &op_ctx),
            emitter.query_type(id, op, &op_ctx),
        );
        let response = format!("Response<{this}[\"responses\"]>");
        let handler = format!(
            "(req: {this}[\"request\"], res: {this}[\"response\"]) => void | Promise<void>"
        );

        fragment.push(Entry::record(
            quote(id),
            [
                ("responses", responses),
                ("request", request),
                ("response", response),
                ("handler", handler),
            ],
        ));
    }
    fragment.render()
}

/// One entry per path, keyed by its Express route, one member per method.
fn handlers_section(index: &OperationIndex<'_>, ctx: &Context<'_>) -> String {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (path, bindings) in index.routes_by_path(PathScope::Paths) {
        let members = bindings.iter().map(|binding| {
            (
                binding.method.as_str(),
                format!("express[{}][\"handler\"]", quote(binding.id)),
            )
        });
        fragment.push(Entry::record(quote(&express_route(path)), members));
    }
    fragment.render()
}
