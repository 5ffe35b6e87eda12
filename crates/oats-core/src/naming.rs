use heck::ToPascalCase;

use crate::parse::operation::{HttpMethod, Operation};

/// The document-supplied `operationId`, ignoring empty strings.
pub fn declared_operation_id(operation: &Operation) -> Option<&str> {
    operation.operation_id.as_deref().filter(|id| !id.is_empty())
}

/// Fallback operation name built from the method verb and every path
/// segment. Parameters contribute `By<Name>`, so routes that differ only in
/// where their parameters sit still get different names. `GET` reads as
/// `get` when the path ends in a parameter and `list` otherwise.
///
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUsersByUserId`
/// - `GET /users/{userId}/messages` → `listUsersByUserIdMessages`
/// - `POST /users` → `createUsers`
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let single = segments.last().is_some_and(|s| path_param(s).is_some());

    let verb = match method {
        HttpMethod::Get if single => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        other => other.as_str(),
    };

    segments.iter().fold(verb.to_string(), |mut name, segment| {
        match path_param(segment) {
            Some(param) => {
                name.push_str("By");
                name.push_str(&param.to_pascal_case());
            }
            None => name.push_str(&segment.to_pascal_case()),
        }
        name
    })
}

fn path_param(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Rewrite OpenAPI path templating into an Express route:
/// `/pets/{petId}/toys` → `/pets/:petId/toys`.
pub fn express_route(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        if ch == '{' {
            out.push(':');
            for inner in chars.by_ref() {
                if inner == '}' {
                    break;
                }
                out.push(inner);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
