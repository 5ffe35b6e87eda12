use indexmap::IndexMap;
use log::{debug, warn};

use crate::naming::{declared_operation_id, route_to_name};
use crate::parse::operation::{HttpMethod, Operation, PathItem};

/// Which top-level map an operation was discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathScope {
    Paths,
    Webhooks,
}

impl PathScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathScope::Paths => "paths",
            PathScope::Webhooks => "webhooks",
        }
    }
}

/// An operation together with where it was found.
#[derive(Debug, Clone, Copy)]
pub struct RegisteredOperation<'a> {
    pub scope: PathScope,
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    pub path_item: &'a PathItem,
}

/// One `(path, method)` slot and the id it was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteBinding<'a> {
    pub scope: PathScope,
    pub path: &'a str,
    pub method: HttpMethod,
    pub id: &'a str,
}

/// An owned record of one registered operation, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSummary {
    pub id: String,
    pub scope: PathScope,
    pub method: HttpMethod,
    pub path: String,
}

/// Accumulates operations while paths are transformed.
///
/// Writers get `&mut OperationRegistry`; readers only ever see the
/// [`OperationIndex`] produced by [`OperationRegistry::seal`], so reading a
/// half-built registry cannot be expressed.
#[derive(Debug, Default)]
pub struct OperationRegistry<'a> {
    operations: IndexMap<String, RegisteredOperation<'a>>,
    routes: Vec<(PathScope, &'a str, HttpMethod, String)>,
}

impl<'a> OperationRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation under `id`.
    ///
    /// A repeated id replaces the earlier entry but keeps its original
    /// position; the displaced entry is returned.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        entry: RegisteredOperation<'a>,
    ) -> Option<RegisteredOperation<'a>> {
        let id = id.into();
        debug!(
            "registering operation {id} ({} {})",
            entry.method.as_str(),
            entry.path
        );
        self.routes
            .push((entry.scope, entry.path, entry.method, id.clone()));
        let previous = self.operations.insert(id.clone(), entry);
        if let Some(ref prev) = previous {
            warn!(
                "operation id {id} is declared by both {} {} and {} {}; keeping the latter",
                prev.method.as_str(),
                prev.path,
                entry.method.as_str(),
                entry.path
            );
        }
        previous
    }

    /// The id `operation` should be registered under.
    ///
    /// A declared `operationId` is used as is, so a document that repeats
    /// one still collides. A route-derived name is made unique against the
    /// ids already taken by appending `2`, `3`, ...
    pub fn assign_id(&self, method: HttpMethod, path: &str, operation: &Operation) -> String {
        if let Some(id) = declared_operation_id(operation) {
            return id.to_string();
        }
        let base = route_to_name(method, path);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.operations.contains_key(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        if candidate != base {
            debug!("{} {path}: {base} is taken, using {candidate}", method.as_str());
        }
        candidate
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Finish writing and hand the entries to readers.
    pub fn seal(self) -> OperationIndex<'a> {
        OperationIndex {
            operations: self.operations,
            routes: self.routes,
        }
    }
}

/// The read-only view of a completed registry.
#[derive(Debug, Default)]
pub struct OperationIndex<'a> {
    operations: IndexMap<String, RegisteredOperation<'a>>,
    routes: Vec<(PathScope, &'a str, HttpMethod, String)>,
}

impl<'a> OperationIndex<'a> {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredOperation<'a>> {
        self.operations.get(id)
    }

    /// Entries in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredOperation<'a>)> {
        self.operations.iter().map(|(id, op)| (id.as_str(), op))
    }

    /// Owned summaries of the entries, in first-registration order.
    pub fn summaries(&self) -> Vec<OperationSummary> {
        self.iter()
            .map(|(id, op)| OperationSummary {
                id: id.to_string(),
                scope: op.scope,
                method: op.method,
                path: op.path.to_string(),
            })
            .collect()
    }

    /// Route slots of `scope`, grouped by path in discovery order, methods
    /// in canonical order within each path.
    pub fn routes_by_path(&self, scope: PathScope) -> IndexMap<&'a str, Vec<RouteBinding<'_>>> {
        let mut grouped: IndexMap<&'a str, Vec<RouteBinding<'_>>> = IndexMap::new();
        for (route_scope, path, method, id) in &self.routes {
            if *route_scope != scope {
                continue;
            }
            grouped.entry(*path).or_default().push(RouteBinding {
                scope: *route_scope,
                path: *path,
                method: *method,
                id: id.as_str(),
            });
        }
        for bindings in grouped.values_mut() {
            bindings.sort_by_key(|b| b.method);
        }
        grouped
    }
}
