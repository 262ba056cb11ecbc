//! Entity-type registry and requested-type resolution.
//!
//! # Responsibility
//! - Hold the injected, immutable set of entity-type descriptors.
//! - Expand a caller's requested type names into registered descriptors.
//!
//! # Invariants
//! - Type names are unique and non-empty.
//! - Table names are plain SQL identifiers; they are interpolated into SQL.
//! - Resolution only narrows: unknown names are dropped, never rejected.

use crate::model::entity_type::{
    EntityType, TypeContributor, CYCLE_TASK_TYPE, PERSON_TYPE, WORKFLOW_TYPE,
};
use crate::query::is_sql_identifier;
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Types reachable only through the generic grant channels in the
/// built-in registry.
const STANDARD_GENERIC_TYPES: &[&str] = &[
    "AccessGroup",
    "Assessment",
    "Clause",
    "Contract",
    "Control",
    "Cycle",
    "DataAsset",
    "Document",
    "Facility",
    "Issue",
    "Market",
    "Objective",
    "OrgGroup",
    "Policy",
    "Process",
    "Product",
    "Project",
    "Regulation",
    "Requirement",
    "Risk",
    "Section",
    "Standard",
    "System",
    "TaskGroup",
    "Threat",
    "Vendor",
];

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry construction errors.
#[derive(Debug)]
pub enum RegistryError {
    EmptyTypeName,
    DuplicateTypeName(String),
    InvalidTableName { type_name: String, table: String },
    /// A contributor reads a model table but the descriptor has none.
    MissingTable {
        type_name: String,
        contributor: TypeContributor,
    },
    InvalidConfig(serde_json::Error),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "entity type name must not be empty"),
            Self::DuplicateTypeName(name) => {
                write!(f, "entity type registered more than once: {name}")
            }
            Self::InvalidTableName { type_name, table } => write!(
                f,
                "entity type `{type_name}` has invalid table name `{table}`"
            ),
            Self::MissingTable {
                type_name,
                contributor,
            } => write!(
                f,
                "entity type `{type_name}` needs a table for contributor `{}`",
                contributor.as_str()
            ),
            Self::InvalidConfig(err) => write!(f, "invalid registry config: {err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    types: Vec<EntityType>,
}

/// Closed set of entity types known to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: Vec<EntityType>,
}

impl TypeRegistry {
    /// Builds a registry from caller-supplied descriptors.
    ///
    /// # Errors
    /// - Empty or duplicate type names.
    /// - Table names that are not plain SQL identifiers.
    /// - Table-reading contributors on a descriptor without a table.
    pub fn new(types: Vec<EntityType>) -> RegistryResult<Self> {
        let mut seen = HashSet::new();
        for entity in &types {
            validate_descriptor(entity)?;
            if !seen.insert(entity.name.as_str()) {
                return Err(RegistryError::DuplicateTypeName(entity.name.clone()));
            }
        }
        Ok(Self { types })
    }

    /// Loads descriptors from a JSON document of the form
    /// `{"types": [{"name": "...", "table": "...", "contributors": [...]}]}`.
    pub fn from_json(json: &str) -> RegistryResult<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::new(file.types)
    }

    /// Built-in registry of governance, workflow and person types.
    pub fn standard() -> Self {
        let mut types = vec![
            EntityType::generic(PERSON_TYPE)
                .with_table("people")
                .with_contributor(TypeContributor::PersonSelfListing),
            EntityType::generic("Program")
                .with_table("programs")
                .with_contributor(TypeContributor::ContextRole),
            EntityType::generic("Audit")
                .with_table("audits")
                .with_contributor(TypeContributor::ContextRole),
            EntityType::generic(WORKFLOW_TYPE)
                .with_table("workflows")
                .with_contributor(TypeContributor::WorkflowBacklog)
                .with_contributor(TypeContributor::ContextRole),
            EntityType::generic(CYCLE_TASK_TYPE)
                .with_table("cycle_task_group_object_tasks")
                .with_contributor(TypeContributor::TaskEligibility),
        ];
        types.extend(STANDARD_GENERIC_TYPES.iter().copied().map(EntityType::generic));
        Self { types }
    }

    pub fn types(&self) -> &[EntityType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EntityType> {
        self.types.iter().find(|entity| entity.name == name)
    }

    /// Expands requested names into registered descriptors.
    ///
    /// `None` or an empty set selects every registered type. Otherwise the
    /// result keeps registry order and silently drops unknown names.
    pub fn resolve_types(&self, requested: Option<&BTreeSet<String>>) -> Vec<&EntityType> {
        let Some(requested) = requested.filter(|names| !names.is_empty()) else {
            return self.types.iter().collect();
        };

        let resolved = self
            .types
            .iter()
            .filter(|entity| requested.contains(&entity.name))
            .collect::<Vec<_>>();

        if resolved.len() < requested.len() {
            debug!(
                "event=types_resolve module=registry status=ok requested={} resolved={} dropped={}",
                requested.len(),
                resolved.len(),
                requested.len() - resolved.len()
            );
        }
        resolved
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_descriptor(entity: &EntityType) -> RegistryResult<()> {
    if entity.name.trim().is_empty() {
        return Err(RegistryError::EmptyTypeName);
    }

    if let Some(table) = entity.table.as_deref() {
        if !is_sql_identifier(table) {
            return Err(RegistryError::InvalidTableName {
                type_name: entity.name.clone(),
                table: table.to_string(),
            });
        }
    }

    if entity.table.is_none() {
        if let Some(contributor) = entity
            .contributors
            .iter()
            .copied()
            .find(|contributor| contributor.requires_table())
        {
            return Err(RegistryError::MissingTable {
                type_name: entity.name.clone(),
                contributor,
            });
        }
    }

    Ok(())
}
