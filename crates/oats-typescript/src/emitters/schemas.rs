use indexmap::IndexMap;
use oats_core::context::Context;
use oats_core::error::EmitError;
use oats_core::fragment::{Entry, Fragment, quote};
use oats_core::parse::media_type::HeaderOrRef;
use oats_core::parse::schema::SchemaOrRef;

use crate::refs::ref_to_ts;
use crate::type_mapper::{doc_text, schema_to_ts};

/// One `"Name": T;` member per schema. Keys outside `ctx.required` are
/// optional.
pub fn emit_schema_map(
    schemas: &IndexMap<String, SchemaOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (name, schema) in schemas {
        let optional = if ctx.is_required(name) { "" } else { "?" };
        let doc = doc_text(schema.description(), false);
        fragment.push(
            Entry::member(format!("{}{optional}", quote(name)), schema_to_ts(schema, ctx)?)
                .with_doc(doc.as_deref()),
        );
    }
    Ok(fragment.render())
}

/// One member per header; required headers lose the `?`.
pub fn emit_headers(
    headers: &IndexMap<String, HeaderOrRef>,
    ctx: &Context<'_>,
) -> Result<String, EmitError> {
    let mut fragment = Fragment::new(ctx.immutable_types);
    for (name, header) in headers {
        let (required, ty, doc) = header_member(header, ctx)?;
        let optional = if required || ctx.is_required(name) { "" } else { "?" };
        fragment.push(
            Entry::member(format!("{}{optional}", quote(name)), ty).with_doc(doc.as_deref()),
        );
    }
    Ok(fragment.render())
}

/// Requiredness, type and doc text of one header.
pub fn header_member(
    header: &HeaderOrRef,
    ctx: &Context<'_>,
) -> Result<(bool, String, Option<String>), EmitError> {
    match header {
        HeaderOrRef::Ref { ref_path } => Ok((false, ref_to_ts(ref_path)?, None)),
        HeaderOrRef::Header(h) => Ok((
            h.required,
            schema_to_ts(&h.value_schema(), ctx)?,
            doc_text(h.description.as_deref(), false),
        )),
    }
}
