//! Entity-type descriptors.
//!
//! # Responsibility
//! - Describe one registered entity type and the per-type contributors that
//!   extend the generic grant channels for it.
//!
//! # Invariants
//! - `TypeContributor` is a closed set; adding behavior means adding a variant.
//! - Contributors that read a model table require `EntityType::table`.

use serde::{Deserialize, Serialize};

/// Type name of person rows.
pub const PERSON_TYPE: &str = "Person";
/// Type name of workflow rows.
pub const WORKFLOW_TYPE: &str = "Workflow";
/// Type name of recurring workflow cycle tasks.
pub const CYCLE_TASK_TYPE: &str = "CycleTaskGroupObjectTask";

/// Per-type rule layered on top of the generic grant channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeContributor {
    /// The actor's own person row.
    PersonSelfListing,
    /// Not-yet-started workflows supplied by a backlog provider.
    WorkflowBacklog,
    /// Instances whose private context the actor holds a role in.
    ContextRole,
    /// Assigned cycle tasks in the current cycle. Replaces the generic ACL
    /// candidate for the type.
    TaskEligibility,
}

impl TypeContributor {
    /// Whether the contributor selects from the descriptor's model table.
    pub fn requires_table(self) -> bool {
        matches!(
            self,
            Self::PersonSelfListing | Self::ContextRole | Self::TaskEligibility
        )
    }

    /// Whether the contributor stands in for the generic ACL channel.
    pub fn replaces_acl_grant(self) -> bool {
        matches!(self, Self::TaskEligibility)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonSelfListing => "person_self_listing",
            Self::WorkflowBacklog => "workflow_backlog",
            Self::ContextRole => "context_role",
            Self::TaskEligibility => "task_eligibility",
        }
    }
}

/// Registered entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    /// Symbolic name stored in `*_type` columns, e.g. `Control`.
    pub name: String,
    /// Backing model table; only needed by table-reading contributors.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub contributors: Vec<TypeContributor>,
}

impl EntityType {
    /// Descriptor reachable only through the generic channels.
    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            contributors: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_contributor(mut self, contributor: TypeContributor) -> Self {
        if !self.contributors.contains(&contributor) {
            self.contributors.push(contributor);
        }
        self
    }

    pub fn has_contributor(&self, contributor: TypeContributor) -> bool {
        self.contributors.contains(&contributor)
    }

    /// Whether the generic ACL channel must skip this type.
    pub fn replaces_acl_grant(&self) -> bool {
        self.contributors
            .iter()
            .any(|contributor| contributor.replaces_acl_grant())
    }
}
