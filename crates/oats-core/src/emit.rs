use indexmap::IndexMap;

use crate::context::Context;
use crate::error::EmitError;
use crate::parse::media_type::HeaderOrRef;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::SchemaOrRef;
use crate::registry::OperationRegistry;

/// Leaf renderers the engine delegates to.
///
/// Map-rendering methods return the members of a type body, one per line,
/// unindented. Type helpers return a single type expression.
pub trait Emitter {
    /// Render a map of schemas. Every key in `ctx.required` is non-optional.
    fn schema_map(
        &self,
        schemas: &IndexMap<String, SchemaOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError>;

    fn responses(
        &self,
        responses: &IndexMap<String, ResponseOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError>;

    /// Render a map of headers. Called with an empty `ctx.required`.
    fn headers(
        &self,
        headers: &IndexMap<String, HeaderOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError>;

    fn request_bodies(
        &self,
        request_bodies: &IndexMap<String, RequestBodyOrRef>,
        ctx: &Context<'_>,
    ) -> Result<String, EmitError>;

    /// Render a paths (or webhooks) map and register every operation found
    /// under its id, tagged with `ctx.scope`.
    fn paths<'a>(
        &self,
        paths: &'a IndexMap<String, PathItem>,
        ctx: &Context<'a>,
        registry: &mut OperationRegistry<'a>,
    ) -> Result<String, EmitError>;

    /// Render the body of one operation. `ctx.path_item` is its owner.
    fn operation(&self, operation: &Operation, ctx: &Context<'_>) -> Result<String, EmitError>;

    /// Union of the response body types of operation `id`, `None` when it
    /// declares none.
    fn response_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> Option<String>;

    /// Request body type of operation `id`.
    fn request_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String;

    /// Query-string type of operation `id`.
    fn query_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String;

    /// Path-parameter type of operation `id`.
    fn path_params_type(&self, id: &str, operation: &Operation, ctx: &Context<'_>) -> String;
}
