//! Workflow cycle task state.
//!
//! # Responsibility
//! - Name the stored task statuses and cycle verification policies.
//! - Decide which statuses still need assignee attention under a policy.
//!
//! # Invariants
//! - Stored status strings are stable and match `TaskStatus::as_db_str`.
//! - `Verified` is never actionable: a verified task is closed.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a cycle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Assigned,
    InProgress,
    Finished,
    Declined,
    Deprecated,
    Verified,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Assigned,
        TaskStatus::InProgress,
        TaskStatus::Finished,
        TaskStatus::Declined,
        TaskStatus::Deprecated,
        TaskStatus::Verified,
    ];

    /// Stored representation in `cycle_task_group_object_tasks.status`.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Finished => "Finished",
            Self::Declined => "Declined",
            Self::Deprecated => "Deprecated",
            Self::Verified => "Verified",
        }
    }

    /// Returns whether a task in this status belongs on the assignee's
    /// dashboard when its cycle follows `policy`.
    pub fn is_actionable_under(self, policy: VerificationPolicy) -> bool {
        policy.actionable_statuses().contains(&self)
    }
}

/// Verification policy of a workflow cycle.
///
/// Finished and declined tasks wait for a verifier only when the cycle
/// requires verification; otherwise they are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationPolicy {
    Required,
    NotRequired,
}

impl VerificationPolicy {
    pub const ALL: [VerificationPolicy; 2] =
        [VerificationPolicy::Required, VerificationPolicy::NotRequired];

    pub fn from_flag(is_verification_needed: bool) -> Self {
        if is_verification_needed {
            Self::Required
        } else {
            Self::NotRequired
        }
    }

    /// Stored value of `cycles.is_verification_needed` for this policy.
    pub fn db_flag(self) -> i64 {
        match self {
            Self::Required => 1,
            Self::NotRequired => 0,
        }
    }

    pub fn actionable_statuses(self) -> &'static [TaskStatus] {
        match self {
            Self::Required => &[
                TaskStatus::Assigned,
                TaskStatus::InProgress,
                TaskStatus::Finished,
                TaskStatus::Declined,
                TaskStatus::Deprecated,
            ],
            Self::NotRequired => &[
                TaskStatus::Assigned,
                TaskStatus::InProgress,
                TaskStatus::Deprecated,
            ],
        }
    }
}
