//! Parameterized fragments for partial updates and dynamic list filters.

use crate::error::AppError;
use serde_json::{Map, Value};

/// One mutable field: the name it carries in request bodies, the column it is
/// stored under, and an optional SQL cast appended to its placeholder.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub api_name: &'static str,
    pub column: &'static str,
    pub cast: Option<&'static str>,
}

/// Quote identifier for PostgreSQL (safe: only from static field specs).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// SET clause for a partial update: one assignment per supplied field, with
/// placeholders numbered from $1 in the same order as `params`.
#[derive(Debug)]
pub struct SetClause {
    pub fragments: Vec<String>,
    pub params: Vec<Value>,
}

impl SetClause {
    /// Comma-joined assignment list for interpolation into an UPDATE.
    pub fn joined(&self) -> String {
        self.fragments.join(", ")
    }

    /// Placeholder index for a parameter appended after the SET values,
    /// e.g. the row identifier in the WHERE clause.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// Build the SET clause for a partial update. Walks the allow-list in order,
/// picking only the fields present in `body`; unrecognized keys never reach
/// the SQL text. Fails when no recognized field is present.
pub fn partial_update(
    body: &Map<String, Value>,
    fields: &[FieldSpec],
) -> Result<SetClause, AppError> {
    let mut fragments = Vec::new();
    let mut params = Vec::new();
    for f in fields {
        let Some(v) = body.get(f.api_name) else {
            continue;
        };
        params.push(v.clone());
        let placeholder = match f.cast {
            Some(t) => format!("${}::{}", params.len(), t),
            None => format!("${}", params.len()),
        };
        fragments.push(format!("{}={}", quoted(f.column), placeholder));
    }
    if fragments.is_empty() {
        return Err(AppError::BadRequest("no data to update".into()));
    }
    Ok(SetClause { fragments, params })
}

/// Accumulates optional filter predicates in the order they are pushed and
/// renders them as one AND-joined WHERE clause. Absent criteria contribute
/// nothing; an empty accumulator renders to nothing.
#[derive(Debug, Default)]
pub struct WhereClause {
    predicates: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    /// `<column> <op> $n` with a bound value.
    pub fn push_cmp(&mut self, column: &str, op: &str, value: Value) {
        self.params.push(value);
        self.predicates
            .push(format!("{} {} ${}", column, op, self.params.len()));
    }

    /// Case-insensitive substring match: `<column> ILIKE $n`, needle wrapped
    /// in wildcard markers.
    pub fn push_ilike(&mut self, column: &str, needle: &str) {
        self.params.push(Value::String(format!("%{}%", needle)));
        self.predicates
            .push(format!("{} ILIKE ${}", column, self.params.len()));
    }

    /// Predicate with no bound value.
    pub fn push_raw(&mut self, predicate: &str) {
        self.predicates.push(predicate.to_string());
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// ` WHERE a AND b` with a leading space, or the empty string.
    pub fn render(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }
}
