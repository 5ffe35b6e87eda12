//! Type expressions for the `express` section. Everything indexes into the
//! `operations` interface, so the route contracts never restate a schema.

use oats_core::context::Context;
use oats_core::fragment::quote;
use oats_core::parse::document::OpenApiVersion;
use oats_core::parse::operation::Operation;
use oats_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use oats_core::parse::request_body::RequestBodyOrRef;
use oats_core::parse::response::ResponseOrRef;

use crate::emitters::operations::merged_parameters;
use crate::type_mapper::union;

fn operation_path(id: &str) -> String {
    format!("operations[{}]", quote(id))
}

/// Union of every declared response body of operation `id`.
pub fn response_type(id: &str, operation: &Operation, ctx: &Context<'_>) -> Option<String> {
    let responses = operation.responses.as_ref()?;
    let base = operation_path(id);
    let mut variants = Vec::new();

    for (code, response) in responses {
        let at = format!("{base}[\"responses\"][{}]", quote(code));
        match (ctx.version, response) {
            (OpenApiVersion::V3, ResponseOrRef::Response(r)) => {
                for mime in r.content.keys() {
                    variants.push(format!("{at}[\"content\"][{}]", quote(mime)));
                }
            }
            (OpenApiVersion::V3, ResponseOrRef::Ref { .. }) => {
                variants.push(format!(
                    "({at} extends {{ content: infer C }} ? C[keyof C] : never)"
                ));
            }
            (OpenApiVersion::V2, ResponseOrRef::Response(r)) => {
                if r.schema.is_some() {
                    variants.push(format!("{at}[\"schema\"]"));
                }
            }
            (OpenApiVersion::V2, ResponseOrRef::Ref { .. }) => {
                variants.push(format!("({at} extends {{ schema: infer S }} ? S : never)"));
            }
        }
    }

    if variants.is_empty() {
        None
    } else {
        Some(union(variants))
    }
}

/// Request body of operation `id`: the 3.x `requestBody` content, or the
/// 2.0 `body`/`formData` parameters. `unknown` when there is none.
pub fn request_type(id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
    let base = operation_path(id);
    match ctx.version {
        OpenApiVersion::V3 => {
            let body = format!("NonNullable<{base}[\"requestBody\"]>");
            match operation.request_body {
                Some(RequestBodyOrRef::RequestBody(ref b)) if !b.content.is_empty() => union(
                    b.content
                        .keys()
                        .map(|mime| format!("{body}[\"content\"][{}]", quote(mime)))
                        .collect(),
                ),
                Some(RequestBodyOrRef::Ref { .. }) => {
                    format!("({body} extends {{ content: infer C }} ? C[keyof C] : never)")
                }
                _ => "unknown".to_string(),
            }
        }
        OpenApiVersion::V2 => {
            let Ok(parameters) = merged_parameters(shared(ctx), &operation.parameters, ctx) else {
                return "unknown".to_string();
            };
            let body = parameters
                .values()
                .find(|p| p.parameter.location == ParameterLocation::Body);
            if let Some(body) = body {
                return format!("{base}[\"parameters\"][\"body\"][{}]", quote(&body.parameter.name));
            }
            if parameters
                .values()
                .any(|p| p.parameter.location == ParameterLocation::FormData)
            {
                return format!("{base}[\"parameters\"][\"formData\"]");
            }
            "unknown".to_string()
        }
    }
}

/// Query-string parameters of operation `id`.
pub fn query_type(id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
    location_type(id, operation, ctx, ParameterLocation::Query)
}

/// Path parameters of operation `id`.
pub fn path_params_type(id: &str, operation: &Operation, ctx: &Context<'_>) -> String {
    location_type(id, operation, ctx, ParameterLocation::Path)
}

fn location_type(
    id: &str,
    operation: &Operation,
    ctx: &Context<'_>,
    location: ParameterLocation,
) -> String {
    let declared = merged_parameters(shared(ctx), &operation.parameters, ctx)
        .map(|params| params.keys().any(|(loc, _)| *loc == location))
        .unwrap_or(false);
    if declared {
        format!("{}[\"parameters\"][{}]", operation_path(id), quote(location.as_str()))
    } else {
        "Record<string, never>".to_string()
    }
}

fn shared<'a>(ctx: &Context<'a>) -> &'a [ParameterOrRef] {
    ctx.path_item.map(|item| item.parameters.as_slice()).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use oats_core::TransformOptions;
    use oats_core::parse::operation::PathItem;
    use serde_json::json;

    fn operation(value: serde_json::Value) -> Operation {
        serde_json::from_value(value).unwrap()
    }

    fn ctx(version: OpenApiVersion) -> Context<'static> {
        Context::new(&TransformOptions::default(), version)
    }

    #[test]
    fn test_v3_response_union() {
        let op = operation(json!({
            "responses": {
                "200": { "content": { "application/json": {}, "text/plain": {} } },
                "204": { "description": "empty" },
                "default": { "$ref": "#/components/responses/Error" }
            }
        }));
        assert_eq!(
            response_type("getPet", &op, &ctx(OpenApiVersion::V3)).unwrap(),
            "operations[\"getPet\"][\"responses\"][\"200\"][\"content\"][\"application/json\"] | \
             operations[\"getPet\"][\"responses\"][\"200\"][\"content\"][\"text/plain\"] | \
             (operations[\"getPet\"][\"responses\"][\"default\"] extends { content: infer C } ? C[keyof C] : never)"
        );
    }

    #[test]
    fn test_no_response_bodies() {
        let op = operation(json!({ "responses": { "204": { "description": "empty" } } }));
        assert_eq!(response_type("a", &op, &ctx(OpenApiVersion::V3)), None);
        assert_eq!(response_type("a", &Operation::default(), &ctx(OpenApiVersion::V3)), None);
    }

    #[test]
    fn test_v2_response_schema() {
        let op = operation(json!({
            "responses": { "200": { "description": "ok", "schema": { "type": "string" } } }
        }));
        assert_eq!(
            response_type("a", &op, &ctx(OpenApiVersion::V2)).unwrap(),
            "operations[\"a\"][\"responses\"][\"200\"][\"schema\"]"
        );
    }

    #[test]
    fn test_v3_request_body() {
        let op = operation(json!({
            "requestBody": { "content": { "application/json": {} } }
        }));
        assert_eq!(
            request_type("a", &op, &ctx(OpenApiVersion::V3)),
            "NonNullable<operations[\"a\"][\"requestBody\"]>[\"content\"][\"application/json\"]"
        );
        assert_eq!(
            request_type("a", &Operation::default(), &ctx(OpenApiVersion::V3)),
            "unknown"
        );
    }

    #[test]
    fn test_v2_body_parameter() {
        let op = operation(json!({
            "parameters": [
                { "name": "pet", "in": "body", "required": true, "schema": { "type": "object" } }
            ]
        }));
        assert_eq!(
            request_type("a", &op, &ctx(OpenApiVersion::V2)),
            "operations[\"a\"][\"parameters\"][\"body\"][\"pet\"]"
        );
    }

    #[test]
    fn test_query_and_path_params() {
        let item: PathItem = serde_json::from_value(json!({
            "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
            "get": {}
        }))
        .unwrap();
        let options = TransformOptions::default();
        let op_ctx = Context::new(&options, OpenApiVersion::V3).with_path_item(&item);
        let op = item.get.as_ref().unwrap();
        assert_eq!(
            path_params_type("a", op, &op_ctx),
            "operations[\"a\"][\"parameters\"][\"path\"]"
        );
        assert_eq!(query_type("a", op, &op_ctx), "Record<string, never>");
    }
}
