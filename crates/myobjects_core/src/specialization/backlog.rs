//! Workflow backlog collaborator.

use crate::model::entity_type::WORKFLOW_TYPE;
use crate::model::object_ref::PersonId;
use crate::query::Relation;
use rusqlite::types::Value;

/// `workflows.kind` of backlog workflows in the built-in store.
pub const BACKLOG_WORKFLOW_KIND: &str = "Backlog";

/// Supplies the not-yet-started workflows an actor should see.
///
/// The returned relation may use any `type`/`context_id` values; the resolver
/// normalizes it to the workflow type with no context before unioning.
pub trait BacklogProvider: Send + Sync {
    fn backlog_workflows(&self, actor: PersonId) -> Relation;
}

/// Backlog provider selecting workflows by their `kind` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindBacklogProvider {
    kind: String,
}

impl KindBacklogProvider {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Default for KindBacklogProvider {
    fn default() -> Self {
        Self::new(BACKLOG_WORKFLOW_KIND)
    }
}

impl BacklogProvider for KindBacklogProvider {
    // Backlog workflows are shared; the actor does not narrow them.
    fn backlog_workflows(&self, _actor: PersonId) -> Relation {
        Relation::from_sql(
            "SELECT id, ? AS type, NULL AS context_id FROM workflows WHERE kind = ?",
            vec![
                Value::Text(WORKFLOW_TYPE.to_string()),
                Value::Text(self.kind.clone()),
            ],
        )
    }
}
