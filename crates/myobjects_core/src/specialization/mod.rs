//! Per-type contributors layered on top of the generic grant channels.
//!
//! # Responsibility
//! - Map each `TypeContributor` to the relation it adds for one type.
//!
//! # Invariants
//! - Contributors are pure: `(context, type) -> Relation`.
//! - Backlog rows are normalized to the contributing type with no context.

pub mod backlog;
pub mod task;

pub use backlog::{BacklogProvider, KindBacklogProvider, BACKLOG_WORKFLOW_KIND};
pub use task::{eligible_tasks, TaskCondition, TASK_ASSIGNEE_ROLES};

use crate::channels;
use crate::model::entity_type::{EntityType, TypeContributor};
use crate::model::object_ref::PersonId;
use crate::query::Relation;

/// Inputs shared by every contributor in one resolution call.
#[derive(Clone, Copy)]
pub struct ContributionContext<'a> {
    pub actor: PersonId,
    pub backlog: &'a dyn BacklogProvider,
}

/// Builds the relation `contributor` adds for `entity`.
pub fn contribute(
    contributor: TypeContributor,
    context: &ContributionContext<'_>,
    entity: &EntityType,
) -> Relation {
    match contributor {
        TypeContributor::PersonSelfListing => channels::person_self_listing(context.actor, entity),
        TypeContributor::WorkflowBacklog => context
            .backlog
            .backlog_workflows(context.actor)
            .restricted_to_type(&entity.name),
        TypeContributor::ContextRole => channels::context_role_grants(context.actor, entity),
        TypeContributor::TaskEligibility => eligible_tasks(context.actor, entity),
    }
}
