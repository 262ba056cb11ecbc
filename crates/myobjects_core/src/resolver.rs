//! Dashboard candidate resolution.
//!
//! # Responsibility
//! - Combine generic grant channels and per-type contributors into one
//!   named candidate relation for an actor.
//!
//! # Invariants
//! - Every candidate has a requested (or, with no request, registered) type.
//! - Candidates are unique by `(id, type)`: all members share the
//!   `(id, type, NULL)` shape and combine with set union.
//! - Creators never receive object-person mapping candidates.
//! - Types whose contributor replaces the ACL grant are excluded from the
//!   generic ACL channel.
//! - Resolution builds SQL only; nothing touches the store until the caller
//!   fetches.

use crate::channels;
use crate::config::ResolverConfig;
use crate::model::object_ref::PersonId;
use crate::query::{NamedRelation, Relation};
use crate::registry::TypeRegistry;
use crate::specialization::{contribute, BacklogProvider, ContributionContext, KindBacklogProvider};
use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Inputs of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MyObjectsRequest {
    /// Requested type names; `None` or empty means every registered type.
    pub types: Option<BTreeSet<String>>,
    pub actor_id: PersonId,
    /// Actor holds only the lowest-privilege creator role.
    pub is_creator: bool,
}

impl MyObjectsRequest {
    pub fn new(actor_id: PersonId) -> Self {
        Self {
            types: None,
            actor_id,
            is_creator: false,
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn creator(mut self, is_creator: bool) -> Self {
        self.is_creator = is_creator;
        self
    }
}

/// Resolves the "my objects" candidate relation.
///
/// Holds only immutable configuration, so one instance can serve every
/// request.
#[derive(Clone)]
pub struct MyObjectsResolver {
    registry: Arc<TypeRegistry>,
    backlog: Arc<dyn BacklogProvider>,
    config: ResolverConfig,
}

impl MyObjectsResolver {
    /// Creates a resolver over `registry` with the kind-based backlog
    /// provider and default configuration.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            backlog: Arc::new(KindBacklogProvider::default()),
            config: ResolverConfig::default(),
        }
    }

    pub fn with_backlog_provider(mut self, backlog: Arc<dyn BacklogProvider>) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, request: &MyObjectsRequest) -> NamedRelation {
        self.resolve_visible_objects(
            request.types.as_ref(),
            request.actor_id,
            request.is_creator,
        )
    }

    /// Builds the candidate relation for `actor_id`.
    ///
    /// The actor is not validated; an unknown id simply yields no rows.
    pub fn resolve_visible_objects(
        &self,
        types: Option<&BTreeSet<String>>,
        actor_id: PersonId,
        is_creator: bool,
    ) -> NamedRelation {
        let alias = self.config.alias();
        let entities = self.registry.resolve_types(types);
        if entities.is_empty() {
            debug!(
                "event=my_objects_resolve module=resolver status=ok actor_id={actor_id} types=0 members=0"
            );
            return Relation::empty().named(alias);
        }

        let type_names = entities
            .iter()
            .map(|entity| entity.name.as_str())
            .collect::<Vec<_>>();
        let acl_type_names = entities
            .iter()
            .filter(|entity| !entity.replaces_acl_grant())
            .map(|entity| entity.name.as_str())
            .collect::<Vec<_>>();

        let mut members = Vec::new();
        if !is_creator {
            members.push(channels::object_people(actor_id, &type_names));
        }
        members.push(channels::custom_attribute_people(actor_id, &type_names));
        members.push(channels::relationship_assignments(actor_id, &type_names));
        members.push(channels::custom_role_grants(actor_id, &acl_type_names));

        let context = ContributionContext {
            actor: actor_id,
            backlog: self.backlog.as_ref(),
        };
        for entity in &entities {
            for contributor in &entity.contributors {
                members.push(contribute(*contributor, &context, entity));
            }
        }

        debug!(
            "event=my_objects_resolve module=resolver status=ok actor_id={actor_id} creator={is_creator} types={} members={}",
            type_names.len(),
            members.len()
        );
        Relation::union(members).named(alias)
    }
}

impl Default for MyObjectsResolver {
    fn default() -> Self {
        Self::new(TypeRegistry::standard())
    }
}
