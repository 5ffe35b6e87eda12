use indexmap::IndexMap;
use oats_core::context::Context;
use oats_core::error::EmitError;
use oats_core::fragment::{Entry, Fragment, quote};
use oats_core::parse::document::OpenApiVersion;
use oats_core::parse::media_type::{HeaderOrRef, MediaType};
use oats_core::parse::request_body::{RequestBody, RequestBodyOrRef};
use oats_core::parse::response::{Response, ResponseOrRef};

use crate::emitters::schemas::header_member;
use crate::refs::ref_to_ts;
use crate::type_mapper::{braced, doc_text, optional_schema_to_ts, property_key};

/// One `"<code>": T;` member per response.
pub fn emit_responses(
    responses: &IndexMap<String, ResponseOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (code, response) in responses {
        let (ty, doc) = match response {
            ResponseOrRef::Ref { ref_path } => (ref_to_ts(ref_path)?, None),
            ResponseOrRef::Response(r) => (
                response_object(r, ctx)?,
                doc_text(r.description.as_deref(), false),
            ),
        };
        fragment.push(Entry::member(quote(code), ty).with_doc(doc.as_deref()));
    }
    Ok(fragment.render())
}

/// One `"<name>": T;` member per reusable request body.
pub fn emit_request_bodies(
    request_bodies: &IndexMap<String, RequestBodyOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (name, body) in request_bodies {
        let (ty, doc) = match body {
            RequestBodyOrRef::Ref { ref_path } => (ref_to_ts(ref_path)?, None),
            RequestBodyOrRef::RequestBody(b) => (
                request_body_object(b, ctx)?,
                doc_text(b.description.as_deref(), false),
            ),
        };
        fragment.push(Entry::member(quote(name), ty).with_doc(doc.as_deref()));
    }
    Ok(fragment.render())
}

/// `{ headers: ...; content: ... }` for 3.x, `{ headers: ...; schema: T }`
/// for 2.0.
pub fn response_object(response: &Response, ctx: &Context<'_>) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);

    if !response.headers.is_empty() {
        fragment.push(Entry::member("headers", headers_object(&response.headers, ctx)?));
    }

    match ctx.version {
        OpenApiVersion::V3 => {
            if response.content.is_empty() {
                fragment.push(Entry::member("content?", "never"));
            } else {
                fragment.push(Entry::member("content", content_object(&response.content, ctx)?));
            }
        }
        OpenApiVersion::V2 => {
            if let Some(ref schema) = response.schema {
                fragment.push(Entry::member(
                    "schema",
                    optional_schema_to_ts(Some(schema), ctx)?,
                ));
            }
        }
    }

    if fragment.is_empty() {
        return Ok("unknown".to_string());
    }
    Ok(braced(&fragment.render()))
}

/// `{ content: { "<mime>": T } }`
pub fn request_body_object(body: &RequestBody, ctx: &Context<'_>) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    fragment.push(Entry::member("content", content_object(&body.content, ctx)?));
    Ok(braced(&fragment.render()))
}

fn content_object(
    content: &IndexMap<String, MediaType>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (mime, media) in content {
        fragment.push(Entry::member(
            quote(mime),
            optional_schema_to_ts(media.schema.as_ref(), ctx)?,
        ));
    }
    if fragment.is_empty() {
        return Ok("Record<string, never>".to_string());
    }
    Ok(braced(&fragment.render()))
}

fn headers_object(
    headers: &IndexMap<String, HeaderOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (name, header) in headers {
        let (required, ty, doc) = header_member(header, ctx)?;
        let optional = if required { "" } else { "?" };
        fragment.push(
            Entry::member(format!("{}{optional}", property_key(name)), ty)
                .with_doc(doc.as_deref()),
        );
    }
    fragment.push(Entry::member("[name: string]", "unknown"));
    Ok(braced(&fragment.render()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oats_core::TransformOptions;
    use serde_json::json;

    fn ctx(version: OpenApiVersion) -> Context<'static> {
        Context::new(&TransformOptions::default(), version)
    }

    #[test]
    fn test_v3_response_with_content_and_headers() {
        let responses: IndexMap<String, ResponseOrRef> = serde_json::from_value(json!({
            "200": {
                "description": "A pet",
                "headers": { "x-next": { "schema": { "type": "string" } } },
                "content": {
                    "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
                }
            },
            "default": { "$ref": "#/components/responses/Error" }
        }))
        .unwrap();
        let rendered = emit_responses(&responses, &ctx(OpenApiVersion::V3)).unwrap();
        insta::assert_snapshot!(rendered.trim_end(), @r#"
        /** A pet */
        "200": {
          headers: {
            "x-next"?: string;
            [name: string]: unknown;
          };
          content: {
            "application/json": components["schemas"]["Pet"];
          };
        };
        "default": components["responses"]["Error"];
        "#);
    }

    #[test]
    fn test_v3_response_without_content() {
        let response: Response =
            serde_json::from_value(json!({ "description": "Deleted" })).unwrap();
        assert_eq!(
            response_object(&response, &ctx(OpenApiVersion::V3)).unwrap(),
            "{\n  content?: never;\n}"
        );
    }

    #[test]
    fn test_v2_response_schema() {
        let response: Response = serde_json::from_value(json!({
            "description": "A pet",
            "schema": { "$ref": "#/definitions/Pet" }
        }))
        .unwrap();
        assert_eq!(
            response_object(&response, &ctx(OpenApiVersion::V2)).unwrap(),
            "{\n  schema: definitions[\"Pet\"];\n}"
        );
        let empty: Response = serde_json::from_value(json!({ "description": "ok" })).unwrap();
        assert_eq!(response_object(&empty, &ctx(OpenApiVersion::V2)).unwrap(), "unknown");
    }

    #[test]
    fn test_request_bodies() {
        let bodies: IndexMap<String, RequestBodyOrRef> = serde_json::from_value(json!({
            "NewPet": {
                "required": true,
                "content": {
                    "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } },
                    "text/plain": {}
                }
            }
        }))
        .unwrap();
        assert_eq!(
            emit_request_bodies(&bodies, &ctx(OpenApiVersion::V3)).unwrap(),
            "\"NewPet\": {\n  content: {\n    \"application/json\": components[\"schemas\"][\"Pet\"];\n    \"text/plain\": unknown;\n  };\n};\n"
        );
    }
}
