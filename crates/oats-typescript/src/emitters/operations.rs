use indexmap::IndexMap;
use log::{debug, warn};
use oats_core::context::Context;
use oats_core::error::EmitError;
use oats_core::fragment::{Entry, Fragment, quote};
use oats_core::parse::operation::{Operation, PathItem};
use oats_core::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use oats_core::parse::request_body::RequestBodyOrRef;
use oats_core::registry::{OperationRegistry, RegisteredOperation};

use crate::emitters::responses::{emit_responses, request_body_object};
use crate::refs::{parameter_ref_name, ref_to_ts};
use crate::type_mapper::{braced, doc_text, property_key, schema_to_ts};

/// A parameter after `$ref` resolution: the declaration that supplies its
/// name and location, and the type it renders as.
#[derive(Debug, Clone)]
pub struct ResolvedParameter<'a> {
    pub parameter: &'a Parameter,
    pub ty: String,
}

/// Render a paths (or webhooks) map and register each operation.
///
/// Every method member points at the shared `operations` interface, so the
/// operation body is rendered once.
pub fn emit_paths<'a>(
    paths: &'a IndexMap<String, PathItem>,
    ctx: &Context<'a>,
    registry: &mut OperationRegistry<'a>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);

    for (path, item) in paths {
        if let Some(ref ref_path) = item.ref_path {
            fragment.push(Entry::member(quote(path), ref_to_ts(ref_path)?));
            continue;
        }

        let mut members = Fragment::new(ctx.immutable_types);
        for (method, op) in item.operations() {
            let id = registry.assign_id(method, path, op);
            members.push(
                Entry::member(method.as_str(), format!("operations[{}]", quote(&id)))
                    .with_doc(op.summary.as_deref()),
            );
            registry.register(
                id,
                RegisteredOperation {
                    scope: ctx.scope,
                    path,
                    method,
                    operation: op,
                    path_item: item,
                },
            );
        }

        if !item.parameters.is_empty() {
            let shared = merged_parameters(&item.parameters, &[], ctx)?;
            members.push(Entry::member("parameters", parameters_object(&shared, ctx)));
        }

        debug!("path {path}: {} members", members.len());
        let doc = item.summary.as_deref().or(item.description.as_deref());
        fragment.push(Entry::block(quote(path), members.render()).with_doc(doc));
    }

    Ok(fragment.render())
}

/// Body of one `operations["<id>"]` entry: `parameters`, `requestBody`,
/// `responses`.
pub fn emit_operation(operation: &Operation, ctx: &Context<'_>) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);

    let shared = ctx.path_item.map(|item| item.parameters.as_slice()).unwrap_or(&[]);
    let parameters = merged_parameters(shared, &operation.parameters, ctx)?;
    if !parameters.is_empty() {
        fragment.push(Entry::member("parameters", parameters_object(&parameters, ctx)));
    }

    if let Some(ref body) = operation.request_body {
        match body {
            RequestBodyOrRef::Ref { ref_path } => {
                fragment.push(Entry::member("requestBody", ref_to_ts(ref_path)?));
            }
            RequestBodyOrRef::RequestBody(b) => {
                let key = if b.required { "requestBody" } else { "requestBody?" };
                fragment.push(
                    Entry::member(key, request_body_object(b, ctx)?)
                        .with_doc(b.description.as_deref()),
                );
            }
        }
    }

    if let Some(ref responses) = operation.responses {
        fragment.push(Entry::member("responses", braced_or_empty(&emit_responses(responses, ctx)?)));
    }

    Ok(fragment.render())
}

/// Path-level parameters overlaid with operation-level ones, keyed by
/// location and name. An operation parameter replaces the path-level one in
/// place.
pub fn merged_parameters<'a>(
    shared: &'a [ParameterOrRef],
    own: &'a [ParameterOrRef],
    ctx: &Context<'a>,
) -> Result<IndexMap<(ParameterLocation, String), ResolvedParameter<'a>>, EmitError> {
    let mut merged = IndexMap::new();
    for param in shared.iter().chain(own) {
        let resolved = resolve_parameter(param, ctx)?;
        merged.insert(
            (resolved.parameter.location, resolved.parameter.name.clone()),
            resolved,
        );
    }
    Ok(merged)
}

/// Follow a parameter reference through the global pool. Only references
/// into the pool itself resolve. References are rendered by name, inline
/// declarations by their value schema.
fn resolve_parameter<'a>(
    param: &'a ParameterOrRef,
    ctx: &Context<'a>,
) -> Result<ResolvedParameter<'a>, EmitError> {
    let ref_path = match param {
        ParameterOrRef::Parameter(p) => {
            return Ok(ResolvedParameter {
                parameter: p,
                ty: schema_to_ts(&p.value_schema(), ctx)?,
            });
        }
        ParameterOrRef::Ref { ref_path } => ref_path,
    };

    let ty = ref_to_ts(ref_path)?;
    let pool = ctx.global_parameters;
    let mut current = ref_path;
    // A chain longer than the pool must contain a cycle.
    for _ in 0..=pool.map(|p| p.len()).unwrap_or(0) {
        let target = parameter_ref_name(current, ctx.version)
            .and_then(|name| pool.and_then(|p| p.get(&name)))
            .ok_or_else(|| {
                warn!("parameter reference {ref_path} does not resolve");
                EmitError::RefTargetNotFound(ref_path.clone())
            })?;
        match target {
            ParameterOrRef::Parameter(parameter) => {
                return Ok(ResolvedParameter { parameter, ty });
            }
            ParameterOrRef::Ref { ref_path: next } => current = next,
        }
    }
    Err(EmitError::Unrenderable {
        location: ref_path.clone(),
        reason: "parameter references form a cycle".to_string(),
    })
}

/// `{ path: {...}; query: {...}; ... }` grouped in location order.
pub fn parameters_object(
    parameters: &IndexMap<(ParameterLocation, String), ResolvedParameter<'_>>,
    ctx: &Context<'_>,
) -> String {
    let mut groups = Fragment::new(ctx.immutable_types);
    for location in ParameterLocation::ALL {
        let mut members = Fragment::new(ctx.immutable_types);
        for resolved in parameters.values() {
            let p = resolved.parameter;
            if p.location != location {
                continue;
            }
            let optional = if p.is_required() { "" } else { "?" };
            let doc = doc_text(p.description.as_deref(), p.deprecated.unwrap_or(false));
            members.push(
                Entry::member(format!("{}{optional}", property_key(&p.name)), resolved.ty.clone())
                    .with_doc(doc.as_deref()),
            );
        }
        if !members.is_empty() {
            groups.push(Entry::member(location.as_str(), braced(&members.render())));
        }
    }
    braced(&groups.render())
}

fn braced_or_empty(members: &str) -> String {
    if members.trim().is_empty() {
        "Record<string, never>".to_string()
    } else {
        braced(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oats_core::parse::document::OpenApiVersion;
    use oats_core::TransformOptions;
    use serde_json::json;

    fn path_item(value: serde_json::Value) -> PathItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_operation_merges_path_parameters() {
        let item = path_item(json!({
            "parameters": [
                { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
                { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
            ],
            "get": {
                "parameters": [
                    { "name": "verbose", "in": "query", "required": true, "schema": { "type": "string" } }
                ],
                "responses": { "204": { "description": "No content" } }
            }
        }));
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3);
        let op_ctx = ctx.with_path_item(&item);
        let rendered = emit_operation(item.get.as_ref().unwrap(), &op_ctx).unwrap();
        insta::assert_snapshot!(rendered.trim_end(), @r#"
        parameters: {
          path: {
            petId: string;
          };
          query: {
            verbose: string;
          };
        };
        responses: {
          /** No content */
          "204": {
            content?: never;
          };
        };
        "#);
    }

    #[test]
    fn test_parameter_refs_resolve_against_pool() {
        let pool: IndexMap<String, ParameterOrRef> = serde_json::from_value(json!({
            "limit": { "name": "limit", "in": "query", "type": "integer" },
            "alias": { "$ref": "#/parameters/limit" }
        }))
        .unwrap();
        let own: Vec<ParameterOrRef> =
            serde_json::from_value(json!([{ "$ref": "#/parameters/alias" }])).unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V2)
            .with_global_parameters(Some(&pool));
        let merged = merged_parameters(&[], &own, &ctx).unwrap();
        let resolved = &merged[&(ParameterLocation::Query, "limit".to_string())];
        assert_eq!(resolved.ty, "parameters[\"alias\"]");
    }

    #[test]
    fn test_unresolved_parameter_ref_fails() {
        let own: Vec<ParameterOrRef> =
            serde_json::from_value(json!([{ "$ref": "#/components/parameters/Missing" }])).unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3);
        assert!(matches!(
            merged_parameters(&[], &own, &ctx),
            Err(EmitError::RefTargetNotFound(r)) if r == "#/components/parameters/Missing"
        ));
    }

    #[test]
    fn test_parameter_ref_outside_pool_fails() {
        let pool: IndexMap<String, ParameterOrRef> = serde_json::from_value(json!({
            "limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
        }))
        .unwrap();
        let own: Vec<ParameterOrRef> =
            serde_json::from_value(json!([{ "$ref": "#/components/schemas/limit" }])).unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3)
            .with_global_parameters(Some(&pool));
        assert!(matches!(
            merged_parameters(&[], &own, &ctx),
            Err(EmitError::RefTargetNotFound(r)) if r == "#/components/schemas/limit"
        ));

        let own: Vec<ParameterOrRef> =
            serde_json::from_value(json!([{ "$ref": "#/components/parameters/limit" }])).unwrap();
        let merged = merged_parameters(&[], &own, &ctx).unwrap();
        assert_eq!(
            merged[&(ParameterLocation::Query, "limit".to_string())].ty,
            "components[\"parameters\"][\"limit\"]"
        );
    }

    #[test]
    fn test_cyclic_parameter_ref_fails() {
        let pool: IndexMap<String, ParameterOrRef> = serde_json::from_value(json!({
            "a": { "$ref": "#/parameters/b" },
            "b": { "$ref": "#/parameters/a" }
        }))
        .unwrap();
        let own: Vec<ParameterOrRef> =
            serde_json::from_value(json!([{ "$ref": "#/parameters/a" }])).unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V2)
            .with_global_parameters(Some(&pool));
        assert!(matches!(
            merged_parameters(&[], &own, &ctx),
            Err(EmitError::Unrenderable { .. })
        ));
    }

    #[test]
    fn test_paths_register_operations() {
        let paths: IndexMap<String, PathItem> = serde_json::from_value(json!({
            "/pets/{petId}": {
                "summary": "A single pet",
                "delete": {},
                "get": { "operationId": "showPet", "summary": "Show a pet" }
            }
        }))
        .unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3);
        let mut registry = OperationRegistry::new();
        let rendered = emit_paths(&paths, &ctx, &mut registry).unwrap();
        insta::assert_snapshot!(rendered.trim_end(), @r#"
        /** A single pet */
        "/pets/{petId}": {
          /** Show a pet */
          get: operations["showPet"];
          delete: operations["deletePetsByPetId"];
        }
        "#);
        let index = registry.seal();
        let ids: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["showPet", "deletePetsByPetId"]);
    }

    #[test]
    fn test_routes_without_ids_stay_distinct() {
        let paths: IndexMap<String, PathItem> = serde_json::from_value(json!({
            "/users/messages": { "get": {} },
            "/users/{id}/messages": { "get": {} },
            "/user-names": { "get": {} },
            "/user_names": { "get": {} }
        }))
        .unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3);
        let mut registry = OperationRegistry::new();
        let rendered = emit_paths(&paths, &ctx, &mut registry).unwrap();
        assert!(rendered.contains("get: operations[\"listUsersMessages\"];"));
        assert!(rendered.contains("get: operations[\"listUsersByIdMessages\"];"));
        assert!(rendered.contains("get: operations[\"listUserNames\"];"));
        assert!(rendered.contains("get: operations[\"listUserNames2\"];"));

        let index = registry.seal();
        let paths: Vec<&str> = index.iter().map(|(_, op)| op.path).collect();
        assert_eq!(
            paths,
            vec!["/users/messages", "/users/{id}/messages", "/user-names", "/user_names"]
        );
    }

    #[test]
    fn test_path_item_ref() {
        let paths: IndexMap<String, PathItem> = serde_json::from_value(json!({
            "/alias": { "$ref": "#/paths/~1pets" }
        }))
        .unwrap();
        let ctx = Context::new(&TransformOptions::default(), OpenApiVersion::V3);
        let mut registry = OperationRegistry::new();
        assert_eq!(
            emit_paths(&paths, &ctx, &mut registry).unwrap(),
            "\"/alias\": paths[\"/pets\"];\n"
        );
        assert!(registry.is_empty());
    }
}
