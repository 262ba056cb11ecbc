//! Candidate row produced by grant channels.

use serde::{Deserialize, Serialize};

/// Identifier of a person row. Actors are people.
pub type PersonId = i64;

/// Identifier of any domain object row.
pub type ObjectId = i64;

/// One candidate object for an actor's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub id: ObjectId,
    /// Symbolic entity-type name, e.g. `Risk`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Legacy grouping id. Always `None` for rows built by this crate.
    pub context_id: Option<i64>,
}

impl ObjectReference {
    pub fn new(id: ObjectId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            context_id: None,
        }
    }

    /// Returns the `(id, type)` identity used for candidate deduplication.
    pub fn identity(&self) -> (ObjectId, &str) {
        (self.id, self.kind.as_str())
    }
}
