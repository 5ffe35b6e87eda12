//! `$ref` pointers to TypeScript indexed-access types.

use oats_core::error::EmitError;
use oats_core::fragment::quote;
use oats_core::parse::document::OpenApiVersion;

/// Root interfaces a local reference may point into.
const ROOTS: [&str; 6] = [
    "components",
    "definitions",
    "parameters",
    "responses",
    "paths",
    "webhooks",
];

/// `#/components/schemas/Pet` → `components["schemas"]["Pet"]`.
///
/// Only local references are supported. Pointer escapes `~1` and `~0` are
/// decoded before quoting.
pub fn ref_to_ts(ref_path: &str) -> Result<String, EmitError> {
    let pointer = ref_path
        .strip_prefix("#/")
        .ok_or_else(|| EmitError::InvalidRefFormat(ref_path.to_string()))?;

    let mut segments = pointer.split('/').map(unescape);
    let root = match segments.next() {
        Some(root) if ROOTS.contains(&root.as_str()) => root,
        _ => return Err(EmitError::InvalidRefFormat(ref_path.to_string())),
    };

    let mut out = root;
    for segment in segments {
        if segment.is_empty() {
            return Err(EmitError::InvalidRefFormat(ref_path.to_string()));
        }
        out.push('[');
        out.push_str(&quote(&segment));
        out.push(']');
    }
    Ok(out)
}

/// The key a parameter reference names in the global parameter pool:
/// `#/parameters/<name>` for 2.0, `#/components/parameters/<name>` for 3.x.
/// References into any other collection name no parameter.
pub fn parameter_ref_name(ref_path: &str, version: OpenApiVersion) -> Option<String> {
    let prefix = match version {
        OpenApiVersion::V2 => "#/parameters/",
        OpenApiVersion::V3 => "#/components/parameters/",
    };
    ref_path
        .strip_prefix(prefix)
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(unescape)
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
