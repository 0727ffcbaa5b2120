use std::str::FromStr;

use serde_json::{json, Map, Value};

use super::document::{ensure_path, value_kind};
use super::error::ScopeError;
use crate::types::AuthorizationContext;

/// The query document shapes the proxy knows how to scope. The caller picks
/// the shape from the endpoint it is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// `query.bool.must`
    Search,
    /// `params.body.query.bool.must`
    InternalSearch,
    /// top-level `boolFilter`
    Suggestions,
}

impl QueryShape {
    fn bool_path(&self) -> Option<&'static [&'static str]> {
        match self {
            QueryShape::Search => Some(&["query", "bool"]),
            QueryShape::InternalSearch => Some(&["params", "body", "query", "bool"]),
            QueryShape::Suggestions => None,
        }
    }
}

impl FromStr for QueryShape {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(QueryShape::Search),
            "internal" | "internal_search" => Ok(QueryShape::InternalSearch),
            "suggestions" => Ok(QueryShape::Suggestions),
            other => Err(ScopeError::UnknownShape(other.to_string())),
        }
    }
}

/// Document field names carrying the tenant dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantFields {
    pub organization: String,
    pub space: String,
}

impl TenantFields {
    /// `<prefix>.org_id` and `<prefix>.space_id`
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            organization: format!("{prefix}.org_id"),
            space: format!("{prefix}.space_id"),
        }
    }
}

impl Default for TenantFields {
    fn default() -> Self {
        Self::with_prefix("@cf")
    }
}

/// Injects tenant-scoping clauses into search documents.
///
/// Scoping mutates the document in place; [`QueryScoper::scoped`] is the
/// owning convenience wrapper. Scoping is not idempotent: every call appends.
#[derive(Debug, Clone, Default)]
pub struct QueryScoper {
    fields: TenantFields,
}

impl QueryScoper {
    pub fn new(fields: TenantFields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &TenantFields {
        &self.fields
    }

    /// Organization clause first, then space
    fn tenant_clauses(&self, context: &AuthorizationContext) -> [Value; 2] {
        [
            json!({ "terms": { self.fields.organization.as_str(): context.organization_ids } }),
            json!({ "terms": { self.fields.space.as_str(): context.space_ids } }),
        ]
    }

    pub fn scope(
        &self,
        shape: QueryShape,
        document: &mut Value,
        context: &AuthorizationContext,
    ) -> Result<(), ScopeError> {
        let clauses = self.tenant_clauses(context);
        match shape.bool_path() {
            Some(path) => {
                let bool_clause = ensure_path(document, path)?;
                append_must(bool_clause, clauses, path)
            }
            None => append_bool_filter(document, clauses),
        }
    }

    pub fn scoped(
        &self,
        shape: QueryShape,
        mut document: Value,
        context: &AuthorizationContext,
    ) -> Result<Value, ScopeError> {
        self.scope(shape, &mut document, context)?;
        Ok(document)
    }

    /// Parse a raw request body (empty means `{}`), scope it and serialize it back
    pub fn scope_body(
        &self,
        shape: QueryShape,
        body: &[u8],
        context: &AuthorizationContext,
    ) -> Result<Vec<u8>, ScopeError> {
        let document = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(body)?
        };
        let document = self.scoped(shape, document, context)?;
        Ok(serde_json::to_vec(&document)?)
    }

    /// Scope every body of a newline-delimited multi-search payload.
    ///
    /// Lines come in header/body pairs; headers are forwarded verbatim and each
    /// body is scoped as a [`QueryShape::Search`] document. Blank lines are
    /// ignored and the output always ends with a newline.
    pub fn scope_msearch(
        &self,
        payload: &str,
        context: &AuthorizationContext,
    ) -> Result<String, ScopeError> {
        let lines: Vec<&str> = payload.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() % 2 != 0 {
            return Err(ScopeError::UnpairedMultiSearch { lines: lines.len() });
        }

        let mut out = String::with_capacity(payload.len() + lines.len() * 64);
        for pair in lines.chunks(2) {
            let mut body: Value = serde_json::from_str(pair[1])?;
            self.scope(QueryShape::Search, &mut body, context)?;
            out.push_str(pair[0]);
            out.push('\n');
            out.push_str(&serde_json::to_string(&body)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Normalize `bool.must` to an array (absent or null becomes empty, a single
/// clause object is wrapped) and append the clauses.
fn append_must(
    bool_clause: &mut Map<String, Value>,
    clauses: [Value; 2],
    path: &[&str],
) -> Result<(), ScopeError> {
    let must = bool_clause.entry("must").or_insert(Value::Null);
    let mut items = match must.take() {
        Value::Null => Vec::new(),
        Value::Object(single) => vec![Value::Object(single)],
        Value::Array(items) => items,
        other => {
            let found = value_kind(&other);
            *must = other;
            return Err(ScopeError::MalformedClause {
                path: format!("{}.must", path.join(".")),
                found,
            });
        }
    };
    items.extend(clauses);
    *must = Value::Array(items);
    Ok(())
}

fn append_bool_filter(document: &mut Value, clauses: [Value; 2]) -> Result<(), ScopeError> {
    let root = ensure_path(document, &[])?;
    let filter = root.entry("boolFilter").or_insert(Value::Null);
    if filter.is_null() {
        *filter = Value::Array(Vec::new());
    }
    match filter {
        Value::Array(items) => {
            items.push(json!({ "bool": { "must": clauses } }));
            Ok(())
        }
        other => Err(ScopeError::MalformedClause {
            path: "boolFilter".to_string(),
            found: value_kind(other),
        }),
    }
}
