//! Cycle task eligibility.
//!
//! # Responsibility
//! - Select the cycle tasks an actor still has to act on.
//!
//! # Invariants
//! - A task qualifies only when all of `TaskCondition`'s conditions hold.
//! - One branch per `VerificationPolicy`; branches are disjoint because a
//!   cycle has exactly one policy, so they combine with `UNION ALL`.
//! - The result replaces the generic ACL candidate for the task type.

use crate::model::entity_type::EntityType;
use crate::model::object_ref::PersonId;
use crate::model::task::VerificationPolicy;
use crate::query::{placeholders, Relation};
use rusqlite::types::Value;

/// Access-control role names that make a person work on a task.
pub const TASK_ASSIGNEE_ROLES: [&str; 2] = ["Task Assignees", "Task Secondary Assignees"];

/// One condition a cycle task must satisfy to reach the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCondition {
    /// The task's cycle is the workflow's current cycle.
    CurrentCycle,
    /// The actor holds an assignee role on the task.
    AssigneeRole,
    /// The task status still needs attention under the cycle's policy.
    ActionableStatus(VerificationPolicy),
}

impl TaskCondition {
    /// Conditions of the branch for cycles following `policy`.
    pub fn for_policy(policy: VerificationPolicy) -> [TaskCondition; 3] {
        [
            TaskCondition::CurrentCycle,
            TaskCondition::AssigneeRole,
            TaskCondition::ActionableStatus(policy),
        ]
    }

    /// Renders the condition as a predicate over `task` and `cycle`.
    fn predicate(self, actor: PersonId, task_type: &str) -> (String, Vec<Value>) {
        match self {
            Self::CurrentCycle => ("cycle.is_current = 1".to_string(), Vec::new()),
            Self::AssigneeRole => {
                // EXISTS keeps one row per task when the actor holds several assignee roles.
                let mut params = vec![
                    Value::Text(task_type.to_string()),
                    Value::Integer(actor),
                    Value::Text(task_type.to_string()),
                ];
                params.extend(
                    TASK_ASSIGNEE_ROLES
                        .iter()
                        .map(|name| Value::Text((*name).to_string())),
                );
                (
                    format!(
                        "EXISTS (
                            SELECT 1
                            FROM access_control_list AS acl
                            JOIN access_control_roles AS role
                              ON role.id = acl.ac_role_id
                            WHERE acl.object_type = ?
                              AND acl.object_id = task.id
                              AND acl.person_id = ?
                              AND role.object_type = ?
                              AND role.name IN ({})
                        )",
                        placeholders(TASK_ASSIGNEE_ROLES.len())
                    ),
                    params,
                )
            }
            Self::ActionableStatus(policy) => {
                let statuses = policy.actionable_statuses();
                let mut params = vec![Value::Integer(policy.db_flag())];
                params.extend(
                    statuses
                        .iter()
                        .map(|status| Value::Text(status.as_db_str().to_string())),
                );
                (
                    format!(
                        "cycle.is_verification_needed = ? AND task.status IN ({})",
                        placeholders(statuses.len())
                    ),
                    params,
                )
            }
        }
    }
}

/// Tasks of `entity` the actor is assigned to in a current cycle and that
/// still need attention.
pub fn eligible_tasks(actor: PersonId, entity: &EntityType) -> Relation {
    let Some(table) = entity.table.as_deref() else {
        return Relation::empty();
    };

    let branches = VerificationPolicy::ALL
        .into_iter()
        .map(|policy| policy_branch(actor, entity, table, policy))
        .collect();
    Relation::union_all(branches)
}

fn policy_branch(
    actor: PersonId,
    entity: &EntityType,
    table: &str,
    policy: VerificationPolicy,
) -> Relation {
    let mut params = vec![Value::Text(entity.name.clone())];
    let mut predicates = Vec::new();
    for condition in TaskCondition::for_policy(policy) {
        let (predicate, condition_params) = condition.predicate(actor, &entity.name);
        predicates.push(predicate);
        params.extend(condition_params);
    }

    Relation::from_sql(
        format!(
            "SELECT task.id AS id, ? AS type, NULL AS context_id
             FROM {table} AS task
             JOIN cycles AS cycle ON cycle.id = task.cycle_id
             WHERE {}",
            predicates.join("\n               AND ")
        ),
        params,
    )
}
