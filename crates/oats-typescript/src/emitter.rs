use indexmap::IndexMap;
use oats_core::context::Context;
use oats_core::emit::Emitter;
use oats_core::error::EmitError;
use oats_core::parse::media_type::HeaderOrRef;
use oats_core::parse::operation::{Operation, PathItem};
use oats_core::parse::request_body::RequestBodyOrRef;
use oats_core::parse::response::ResponseOrRef;
use oats_core::parse::schema::SchemaOrRef;
use oats_core::registry::OperationRegistry;

use crate::emitters::{operations, responses, route_types, schemas};

/// Renders every section as TypeScript interface members.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptEmitter;

impl Emitter for TypeScriptEmitter {
    fn schema_map(
        &self,
        schemas: &IndexMap<String, SchemaOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError> {
        schemas::emit_schema_map(schemas, ctx)
    }

    fn responses(
        &self,
        responses: &IndexMap<String, ResponseOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError> {
        responses::emit_responses(responses, ctx)
    }

    fn headers(
        &self,
        headers: &IndexMap<String, HeaderOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError> {
        schemas::emit_headers(headers, ctx)
    }

    fn request_bodies(
        &self,
        request_bodies: &IndexMap<String, RequestBodyOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError> {
        responses::emit_request_bodies(request_bodies, ctx)
    }

    fn paths<'a>(
        &self,
        paths: &'a IndexMap<String, PathItem>,
        ctx: &Context<'a>,
        registry: &mut OperationRegistry<'a>,
    ) -> Result<String, EmitError> {
        operations::emit_paths(paths, ctx, registry)
    }

    fn operation(&self, operation: &Operation, ctx: &Context<'_>) -> Result<String, EmitError> {
        operations::emit_operation(operation, ctx)
    }

    fn response_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> Option<String> {
        route_types::response_type(id, operation, ctx)
    }

    fn request_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
        route_types::request_type(id, operation, ctx)
    }

    fn query_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
        route_types::query_type(id, operation, ctx)
    }

    fn path_params_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
        route_types::path_params_type(id, operation, ctx)
    }
}
