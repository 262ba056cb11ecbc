//! Dashboard "my objects" candidate resolution.
//!
//! Builds, for one actor, a lazy SQL relation of every object reachable
//! through a grant channel. The relation only narrows candidates; the
//! permission system still decides what the actor may read.

pub mod channels;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod specialization;

pub use config::{ConfigError, ResolverConfig, DEFAULT_RELATION_ALIAS};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::entity_type::{
    EntityType, TypeContributor, CYCLE_TASK_TYPE, PERSON_TYPE, WORKFLOW_TYPE,
};
pub use model::object_ref::{ObjectId, ObjectReference, PersonId};
pub use model::task::{TaskStatus, VerificationPolicy};
pub use query::{NamedRelation, Relation, RelationQuery, ResolveError, ResolveResult};
pub use registry::{RegistryError, RegistryResult, TypeRegistry};
pub use resolver::{MyObjectsRequest, MyObjectsResolver};
pub use service::dashboard_service::{DashboardService, MyObjectsListQuery};
pub use specialization::{BacklogProvider, KindBacklogProvider};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
