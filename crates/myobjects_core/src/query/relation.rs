//! Relation values and caller-side composition.

use crate::db::DbError;
use crate::model::object_ref::ObjectReference;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const EMPTY_RELATION_SQL: &str = "SELECT NULL AS id, NULL AS type, NULL AS context_id WHERE 0";

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error raised while executing a resolved relation.
///
/// Store failures are passed through unmodified.
#[derive(Debug)]
pub enum ResolveError {
    Db(DbError),
    /// A produced row does not have the candidate shape.
    InvalidData(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid candidate row: {message}"),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ResolveError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ResolveError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Unexecuted `SELECT id, type, context_id ...` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    sql: String,
    params: Vec<Value>,
}

impl Relation {
    /// Wraps a select producing `id, type, context_id` columns.
    ///
    /// `params` must match the `?` placeholders of `sql` in order.
    pub fn from_sql(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Relation with no rows.
    pub fn empty() -> Self {
        Self::from_sql(EMPTY_RELATION_SQL, Vec::new())
    }

    pub fn is_empty_relation(&self) -> bool {
        self.sql == EMPTY_RELATION_SQL
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Set union: concatenates members and drops identical rows.
    pub fn union(members: Vec<Relation>) -> Self {
        Self::compound(members, "UNION")
    }

    /// Bag union: concatenates members, keeping every row.
    pub fn union_all(members: Vec<Relation>) -> Self {
        Self::compound(members, "UNION ALL")
    }

    /// Projects onto the common shape with `context_id` cleared and keeps
    /// only rows of `type_name`.
    pub fn restricted_to_type(self, type_name: &str) -> Self {
        let mut params = self.params;
        params.push(Value::Text(type_name.to_string()));
        Self::from_sql(
            format!(
                "SELECT id, type, NULL AS context_id FROM (\n{}\n) WHERE type = ?",
                self.sql
            ),
            params,
        )
    }

    /// Names the relation so it can be joined and filtered as a subquery.
    pub(crate) fn named(self, alias: impl Into<String>) -> NamedRelation {
        NamedRelation {
            alias: alias.into(),
            relation: self,
        }
    }

    fn compound(members: Vec<Relation>, operator: &str) -> Self {
        let mut members = members
            .into_iter()
            .filter(|member| !member.is_empty_relation())
            .collect::<Vec<_>>();

        match members.len() {
            0 => return Self::empty(),
            1 => return members.remove(0),
            _ => {}
        }

        let mut parts = Vec::with_capacity(members.len());
        let mut params = Vec::new();
        for member in members {
            // Compound members cannot carry ORDER BY/LIMIT in SQLite, so each
            // one is wrapped as a plain select.
            parts.push(format!(
                "SELECT id, type, context_id FROM (\n{}\n)",
                member.sql
            ));
            params.extend(member.params);
        }

        let separator = format!("\n{operator}\n");
        Self::from_sql(parts.join(separator.as_str()), params)
    }
}

/// Candidate relation exposed under a stable alias.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRelation {
    alias: String,
    relation: Relation,
}

impl NamedRelation {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn sql(&self) -> &str {
        self.relation.sql()
    }

    pub fn params(&self) -> &[Value] {
        self.relation.params()
    }

    /// Returns `(<sql>) AS <alias>` for embedding in a larger `FROM` clause.
    /// Bind `params()` at the embedding position.
    pub fn as_subquery(&self) -> String {
        format!("(\n{}\n) AS {}", self.relation.sql(), self.alias)
    }

    /// Starts a caller-side query over this relation.
    pub fn query(&self) -> RelationQuery<'_> {
        RelationQuery::new(self)
    }

    /// Materializes every candidate row on `conn`.
    pub fn fetch_all(&self, conn: &Connection) -> ResolveResult<Vec<ObjectReference>> {
        self.query().fetch(conn)
    }
}

/// Joins, predicates, ordering and pagination layered over a
/// [`NamedRelation`]. Nothing executes until `fetch` or `count`.
#[derive(Debug, Clone)]
pub struct RelationQuery<'r> {
    relation: &'r NamedRelation,
    joins: Vec<String>,
    join_params: Vec<Value>,
    predicates: Vec<String>,
    predicate_params: Vec<Value>,
    order_by: Vec<String>,
    limit: Option<u32>,
    offset: u32,
}

impl<'r> RelationQuery<'r> {
    fn new(relation: &'r NamedRelation) -> Self {
        Self {
            relation,
            joins: Vec::new(),
            join_params: Vec::new(),
            predicates: Vec::new(),
            predicate_params: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Appends a join clause, e.g. `JOIN grants ON grants.object_id = my_objects.id`.
    pub fn join(mut self, clause: &str, params: impl IntoIterator<Item = Value>) -> Self {
        self.joins.push(clause.to_string());
        self.join_params.extend(params);
        self
    }

    /// Adds a predicate; all predicates are combined with `AND`.
    pub fn filter(mut self, predicate: &str, params: impl IntoIterator<Item = Value>) -> Self {
        self.predicates.push(format!("({predicate})"));
        self.predicate_params.extend(params);
        self
    }

    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Renders the full statement and its parameters in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let alias = self.relation.alias();
        let (mut sql, mut params) = self.base_select(&format!(
            "{alias}.id AS id, {alias}.type AS type, {alias}.context_id AS context_id"
        ));

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                params.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            params.push(Value::Integer(i64::from(self.offset)));
        }

        (sql, params)
    }

    /// Executes the query and decodes candidate rows.
    pub fn fetch(&self, conn: &Connection) -> ResolveResult<Vec<ObjectReference>> {
        let started_at = Instant::now();
        let (sql, params) = self.to_sql();

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut references = Vec::new();
        while let Some(row) = rows.next()? {
            references.push(parse_reference_row(row)?);
        }

        debug!(
            "event=relation_fetch module=query status=ok relation={} rows={} duration_ms={}",
            self.relation.alias(),
            references.len(),
            started_at.elapsed().as_millis()
        );
        Ok(references)
    }

    /// Counts matching rows, ignoring ordering and pagination.
    pub fn count(&self, conn: &Connection) -> ResolveResult<u64> {
        let (sql, params) = self.base_select("COUNT(*)");
        let count: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| ResolveError::InvalidData(format!("negative row count `{count}`")))
    }

    fn base_select(&self, columns: &str) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {columns} FROM {}", self.relation.as_subquery());
        let mut params = self.relation.params().to_vec();

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        params.extend(self.join_params.iter().cloned());

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        params.extend(self.predicate_params.iter().cloned());

        (sql, params)
    }
}

fn parse_reference_row(row: &Row<'_>) -> ResolveResult<ObjectReference> {
    let id = row
        .get::<_, Option<i64>>("id")?
        .ok_or_else(|| ResolveError::InvalidData("null id".to_string()))?;
    let kind = row
        .get::<_, Option<String>>("type")?
        .ok_or_else(|| ResolveError::InvalidData(format!("null type for id `{id}`")))?;

    Ok(ObjectReference {
        id,
        kind,
        context_id: row.get("context_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::Relation;
    use rusqlite::types::Value;
    use rusqlite::Connection;

    fn literal(id: i64, kind: &str) -> Relation {
        Relation::from_sql(
            "SELECT ? AS id, ? AS type, NULL AS context_id",
            vec![Value::Integer(id), Value::Text(kind.to_string())],
        )
    }

    #[test]
    fn union_of_nothing_is_empty() {
        assert!(Relation::union(Vec::new()).is_empty_relation());
        assert!(Relation::union(vec![Relation::empty(), Relation::empty()]).is_empty_relation());
    }

    #[test]
    fn union_of_one_member_is_that_member() {
        let single = literal(1, "Risk");
        assert_eq!(
            Relation::union(vec![Relation::empty(), single.clone()]),
            single
        );
    }

    #[test]
    fn union_keeps_params_in_member_order() {
        let relation = Relation::union(vec![literal(1, "Risk"), literal(2, "Control")]);
        assert_eq!(
            relation.params(),
            &[
                Value::Integer(1),
                Value::Text("Risk".to_string()),
                Value::Integer(2),
                Value::Text("Control".to_string()),
            ]
        );
        assert_eq!(relation.sql().matches("UNION").count(), 1);
    }

    #[test]
    fn union_deduplicates_and_union_all_does_not() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let dedup = Relation::union(vec![literal(1, "Risk"), literal(1, "Risk")]).named("t");
        let bag = Relation::union_all(vec![literal(1, "Risk"), literal(1, "Risk")]).named("t");

        assert_eq!(dedup.fetch_all(&conn).expect("union fetch").len(), 1);
        assert_eq!(bag.fetch_all(&conn).expect("union all fetch").len(), 2);
    }

    #[test]
    fn query_params_follow_clause_order() {
        let named = literal(7, "Risk").named("my_objects");
        let (sql, params) = named
            .query()
            .join(
                "JOIN (SELECT ? AS allowed_id) AS grants ON grants.allowed_id = my_objects.id",
                [Value::Integer(7)],
            )
            .filter("my_objects.type = ?", [Value::Text("Risk".to_string())])
            .order_by("my_objects.id")
            .limit(10)
            .offset(5)
            .to_sql();

        assert!(sql.contains(") AS my_objects JOIN"));
        assert!(sql.ends_with("ORDER BY my_objects.id LIMIT ? OFFSET ?"));
        assert_eq!(
            params,
            vec![
                Value::Integer(7),
                Value::Text("Risk".to_string()),
                Value::Integer(7),
                Value::Text("Risk".to_string()),
                Value::Integer(10),
                Value::Integer(5),
            ]
        );
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let named = literal(1, "Risk").named("t");
        let (sql, _) = named.query().offset(3).to_sql();
        assert!(sql.ends_with("LIMIT -1 OFFSET ?"));
    }

    #[test]
    fn composed_query_executes() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let named = Relation::union(vec![
            literal(1, "Risk"),
            literal(2, "Control"),
            literal(3, "Risk"),
        ])
        .named("my_objects");

        let risks = named
            .query()
            .filter("my_objects.type = ?", [Value::Text("Risk".to_string())])
            .order_by("my_objects.id DESC")
            .fetch(&conn)
            .expect("filtered fetch");
        let ids = risks.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 1]);

        let total = named.query().limit(1).count(&conn).expect("count");
        assert_eq!(total, 3);
    }

    #[test]
    fn restricted_to_type_drops_other_types_and_context() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let source = Relation::from_sql(
            "SELECT 4 AS id, 'Workflow' AS type, 99 AS context_id
             UNION ALL SELECT 5, 'Risk', NULL",
            Vec::new(),
        );
        let rows = source
            .restricted_to_type("Workflow")
            .named("t")
            .fetch_all(&conn)
            .expect("restricted fetch");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 4);
        assert_eq!(rows[0].context_id, None);
    }
}
