use oats_core::context::Context;
use oats_core::error::EmitError;
use oats_core::fragment::{Entry, Fragment, indent, quote};
use oats_core::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use serde_json::Value;

use crate::refs::ref_to_ts;

/// Map a schema (or reference) to its TypeScript type expression.
///
/// Object types span several lines; the closing brace sits at column zero so
/// callers can indent the whole expression as a block.
pub fn schema_to_ts(schema: &SchemaOrRef, ctx: &Context<'_>) -> Result<String, EmitError> {
    match schema {
        SchemaOrRef::Ref { ref_path } => ref_to_ts(ref_path),
        SchemaOrRef::Schema(s) => {
            let base = base_type(s, ctx)?;
            if s.is_nullable() && base != "null" && base != "unknown" {
                Ok(format!("{base} | null"))
            } else {
                Ok(base)
            }
        }
    }
}

/// Same as [`schema_to_ts`], `unknown` when there is no schema at all.
pub fn optional_schema_to_ts(
    schema: Option<&SchemaOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    match schema {
        Some(schema) => schema_to_ts(schema, ctx),
        None => Ok("unknown".to_string()),
    }
}

fn base_type(s: &Schema, ctx: &Context<'_>) -> Result<String, EmitError> {
    if let Some(ref value) = s.const_value {
        return Ok(literal(value));
    }
    if !s.enum_values.is_empty() {
        return Ok(union(s.enum_values.iter().map(literal).collect()));
    }

    let mut parts = Vec::new();
    for member in &s.all_of {
        parts.push(schema_to_ts(member, ctx)?);
    }
    if !s.one_of.is_empty() {
        parts.push(union(schema_list(&s.one_of, ctx)?));
    }
    if !s.any_of.is_empty() {
        parts.push(union(schema_list(&s.any_of, ctx)?));
    }
    if !parts.is_empty() {
        if has_object_shape(s) {
            parts.push(object_type(s, ctx)?);
        }
        return Ok(intersection(parts));
    }

    match s.schema_type {
        Some(TypeSet::Single(ty)) => keyword_type(ty, s, ctx),
        Some(TypeSet::Multiple(ref types)) => {
            let variants = types
                .iter()
                .map(|ty| keyword_type(*ty, s, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(union(variants))
        }
        None if has_object_shape(s) => object_type(s, ctx),
        None if s.items.is_some() => array_type(s, ctx),
        None => Ok("unknown".to_string()),
    }
}

fn keyword_type(ty: SchemaType, s: &Schema, ctx: &Context<'_>) -> Result<String, EmitError> {
    let ts = match ty {
        SchemaType::String => "string",
        SchemaType::Number | SchemaType::Integer => "number",
        SchemaType::Boolean => "boolean",
        SchemaType::Null => "null",
        SchemaType::File => "unknown",
        SchemaType::Array => return array_type(s, ctx),
        SchemaType::Object => return object_type(s, ctx),
    };
    Ok(ts.to_string())
}

fn array_type(s: &Schema, ctx: &Context<'_>) -> Result<String, EmitError> {
    let inner = match s.items {
        Some(ref items) => schema_to_ts(items, ctx)?,
        None => "unknown".to_string(),
    };
    let inner = if inner.contains(" | ") || inner.contains(" & ") {
        format!("({inner})")
    } else {
        inner
    };
    Ok(format!("{}{inner}[]", ctx.readonly()))
}

fn object_type(s: &Schema, ctx: &Context<'_>) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);

    for (name, prop) in &s.properties {
        let optional = if s.required.contains(name) { "" } else { "?" };
        let key = format!("{}{optional}", property_key(name));
        let doc = doc_text(prop.description(), is_deprecated(prop));
        fragment.push(Entry::member(key, schema_to_ts(prop, ctx)?).with_doc(doc.as_deref()));
    }

    match s.additional_properties {
        Some(AdditionalProperties::Bool(true)) => {
            fragment.push(Entry::member("[key: string]", "unknown"));
        }
        // Declared properties must stay assignable to the index signature.
        Some(AdditionalProperties::Schema(ref value)) if s.properties.is_empty() => {
            fragment.push(Entry::member("[key: string]", schema_to_ts(value, ctx)?));
        }
        Some(AdditionalProperties::Schema(_)) => {
            fragment.push(Entry::member("[key: string]", "unknown"));
        }
        Some(AdditionalProperties::Bool(false)) if fragment.is_empty() => {
            return Ok("Record<string, never>".to_string());
        }
        _ => {}
    }

    if fragment.is_empty() {
        return Ok("Record<string, unknown>".to_string());
    }
    Ok(braced(&fragment.render()))
}

fn has_object_shape(s: &Schema) -> bool {
    !s.properties.is_empty() || s.additional_properties.is_some()
}

fn schema_list(schemas: &[SchemaOrRef], ctx: &Context<'_>) -> Result<Vec<String>, EmitError> {
    schemas.iter().map(|s| schema_to_ts(s, ctx)).collect()
}

fn is_deprecated(schema: &SchemaOrRef) -> bool {
    match schema {
        SchemaOrRef::Schema(s) => s.deprecated.unwrap_or(false),
        SchemaOrRef::Ref { .. } => false,
    }
}

/// Wrap member lines in braces, indenting them one level.
pub fn braced(members: &str) -> String {
    format!("{{\n{}\n}}", indent(members.trim_end(), 2))
}

/// JSDoc text for a member, with `@deprecated` appended when flagged.
pub fn doc_text(description: Option<&str>, deprecated: bool) -> Option<String> {
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    match (description, deprecated) {
        (Some(d), true) => Some(format!("{d}\n@deprecated")),
        (Some(d), false) => Some(d.to_string()),
        (None, true) => Some("@deprecated".to_string()),
        (None, false) => None,
    }
}

/// Property names that are valid identifiers stay bare; anything else is
/// quoted.
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid { name.to_string() } else { quote(name) }
}

/// A JSON value as a TypeScript literal type.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) | Value::Object(_) => "unknown".to_string(),
    }
}

pub fn union(variants: Vec<String>) -> String {
    match variants.len() {
        0 => "never".to_string(),
        _ => variants.join(" | "),
    }
}

fn intersection(parts: Vec<String>) -> String {
    if parts.len() == 1 {
        return parts.into_iter().next().unwrap_or_default();
    }
    parts
        .into_iter()
        .map(|p| if p.contains(" | ") { format!("({p})") } else { p })
        .collect::<Vec<_>>()
        .join(" & ")
}
