//! Resolver configuration.
//!
//! # Invariants
//! - The relation alias is a plain SQL identifier; it is interpolated into
//!   caller-side queries.

use crate::query::is_sql_identifier;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Alias of the resolved candidate relation unless configured otherwise.
pub const DEFAULT_RELATION_ALIAS: &str = "my_objects";

/// Environment variable overriding the relation alias.
pub const RELATION_ALIAS_ENV: &str = "MYOBJECTS_RELATION_ALIAS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidAlias(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAlias(alias) => write!(
                f,
                "relation alias must be a plain SQL identifier, got `{alias}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings applied to every relation a resolver builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    alias: String,
}

impl ResolverConfig {
    pub fn new(alias: impl Into<String>) -> Result<Self, ConfigError> {
        let alias = alias.into();
        if !is_sql_identifier(&alias) {
            return Err(ConfigError::InvalidAlias(alias));
        }
        Ok(Self { alias })
    }

    /// Reads `MYOBJECTS_RELATION_ALIAS`, falling back to the default alias
    /// when unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(RELATION_ALIAS_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            alias: DEFAULT_RELATION_ALIAS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ResolverConfig, DEFAULT_RELATION_ALIAS};

    #[test]
    fn default_alias_is_my_objects() {
        assert_eq!(ResolverConfig::default().alias(), DEFAULT_RELATION_ALIAS);
    }

    #[test]
    fn rejects_alias_with_sql() {
        let err = ResolverConfig::new("x) UNION SELECT").expect_err("alias must be identifier");
        assert_eq!(err, ConfigError::InvalidAlias("x) UNION SELECT".to_string()));
    }

    #[test]
    fn accepts_identifier_alias() {
        let config = ResolverConfig::new("dashboard_candidates").expect("valid alias");
        assert_eq!(config.alias(), "dashboard_candidates");
    }
}
