//! Command-line probe for dashboard candidate resolution.
//!
//! Prints one `<type> <id>` line per candidate. File logging is enabled when
//! `MYOBJECTS_LOG_DIR` is set.

use clap::Parser;
use log::error;
use myobjects_core::db::open_db;
use myobjects_core::{
    core_version, init_logging, DashboardService, LoggingConfig, MyObjectsListQuery,
    MyObjectsResolver, ResolverConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// List the objects an actor's dashboard would show.
#[derive(Parser, Debug)]
#[command(name = "myobjects", version = core_version())]
struct Cli {
    /// Path to the SQLite grant store
    db_path: PathBuf,

    /// Person id of the actor
    actor_id: i64,

    /// Resolve for a creator (skips object-person mappings)
    #[arg(long)]
    creator: bool,

    /// Restrict to these entity types
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,

    /// Page size (default 50, max 200)
    #[arg(long)]
    limit: Option<u32>,
}

impl Cli {
    fn list_query(&self) -> MyObjectsListQuery {
        let types = self
            .types
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<std::collections::BTreeSet<_>>();
        MyObjectsListQuery {
            types: (!types.is_empty()).then_some(types),
            actor_id: self.actor_id,
            is_creator: self.creator,
            limit: self.limit,
            ..MyObjectsListQuery::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("myobjects: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(config) = LoggingConfig::from_env().map_err(|err| err.to_string())? {
        init_logging(&config).map_err(|err| err.to_string())?;
    }

    let config = ResolverConfig::from_env().map_err(|err| err.to_string())?;
    let resolver = MyObjectsResolver::default().with_config(config);
    let conn = open_db(&cli.db_path).map_err(|err| err.to_string())?;

    let service = DashboardService::new(&conn, &resolver);
    let rows = service
        .list_my_objects(&cli.list_query())
        .map_err(|err| err.to_string())?;
    for row in rows {
        println!("{} {}", row.kind, row.id);
    }
    Ok(())
}
