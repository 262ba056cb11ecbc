//! Dashboard "my objects" use-case service.
//!
//! # Responsibility
//! - Materialize one page of an actor's candidate objects.
//! - Show how callers compose ordering and pagination over the resolved
//!   relation without re-deriving channel logic.
//!
//! # Invariants
//! - Pages are ordered by `type ASC, id ASC`.
//! - Runs on the borrowed connection; when that is a transaction, reads see
//!   its snapshot.

use crate::model::object_ref::{ObjectReference, PersonId};
use crate::query::ResolveResult;
use crate::resolver::{MyObjectsRequest, MyObjectsResolver};
use log::{error, info};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::time::Instant;

const MY_OBJECTS_DEFAULT_LIMIT: u32 = 50;
const MY_OBJECTS_LIMIT_MAX: u32 = 200;

/// Query options for listing an actor's dashboard candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MyObjectsListQuery {
    pub types: Option<BTreeSet<String>>,
    pub actor_id: PersonId,
    pub is_creator: bool,
    /// Maximum rows to return. Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl MyObjectsListQuery {
    fn request(&self) -> MyObjectsRequest {
        MyObjectsRequest {
            types: self.types.clone(),
            actor_id: self.actor_id,
            is_creator: self.is_creator,
        }
    }
}

/// Use-case wrapper binding a resolver to one connection.
pub struct DashboardService<'conn> {
    conn: &'conn Connection,
    resolver: &'conn MyObjectsResolver,
}

impl<'conn> DashboardService<'conn> {
    pub fn new(conn: &'conn Connection, resolver: &'conn MyObjectsResolver) -> Self {
        Self { conn, resolver }
    }

    /// Lists one page of candidates.
    ///
    /// Store failures are returned unchanged; no partial page is produced.
    pub fn list_my_objects(&self, query: &MyObjectsListQuery) -> ResolveResult<Vec<ObjectReference>> {
        let started_at = Instant::now();
        let relation = self.resolver.resolve(&query.request());
        let alias = relation.alias();
        let limit = normalize_my_objects_limit(query.limit);

        let result = relation
            .query()
            .order_by(&format!("{alias}.type ASC"))
            .order_by(&format!("{alias}.id ASC"))
            .limit(limit)
            .offset(query.offset)
            .fetch(self.conn);

        match &result {
            Ok(rows) => info!(
                "event=my_objects_list module=service status=ok actor_id={} creator={} rows={} limit={} offset={} duration_ms={}",
                query.actor_id,
                query.is_creator,
                rows.len(),
                limit,
                query.offset,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=my_objects_list module=service status=error actor_id={} duration_ms={} error={}",
                query.actor_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Counts every candidate, ignoring pagination.
    pub fn count_my_objects(&self, query: &MyObjectsListQuery) -> ResolveResult<u64> {
        self.resolver
            .resolve(&query.request())
            .query()
            .count(self.conn)
    }
}

/// Normalizes a requested page size: missing or zero uses the default,
/// oversize requests clamp to the maximum.
pub fn normalize_my_objects_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => MY_OBJECTS_DEFAULT_LIMIT,
        Some(value) if value > MY_OBJECTS_LIMIT_MAX => MY_OBJECTS_LIMIT_MAX,
        Some(value) => value,
    }
}
