//! Lazy, composable SQL relations.
//!
//! # Responsibility
//! - Represent candidate sets as unexecuted SQL plus bound parameters.
//! - Let callers attach joins, predicates, ordering and pagination before
//!   anything touches the store.
//!
//! # Invariants
//! - Every relation selects exactly `id, type, context_id`, in that order.
//! - Parameters are positional (`?`) and stored in SQL text order.
//! - Execution borrows the caller's connection; no transaction is opened.

use once_cell::sync::Lazy;
use regex::Regex;

mod relation;

pub use relation::{NamedRelation, Relation, RelationQuery, ResolveError, ResolveResult};

static SQL_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern should compile")
});

/// Returns whether `value` can be interpolated into SQL as a bare identifier.
pub fn is_sql_identifier(value: &str) -> bool {
    SQL_IDENTIFIER.is_match(value)
}

/// Builds `?, ?, ?` with `count` positional placeholders.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
