//! Schema for the grant stores read by the channels.
//!
//! Each step adds one group of tables: people and their object mappings,
//! then access-control roles, then workflow cycles and tasks.
//!
//! # Invariants
//! - Steps are numbered without gaps and the store records the last one
//!   applied in `PRAGMA user_version`.
//! - A store newer than this build is refused, never downgraded.
//! - Pending steps apply in one transaction.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_people_and_mappings.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_access_control.sql"),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_workflows.sql"),
    },
];

/// Schema version a freshly opened grant store ends up at.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the grant store schema up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
