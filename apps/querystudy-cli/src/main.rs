mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use members::infra::storage::query::{aggregate, sorting};
use members::{
    Member, MemberSearchCondition, MembersService, Migrator, OrmMembersRepository, ServiceConfig,
};
use querystudy_db::{DbHandle, build_db_handle};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;

use crate::config::AppConfig;

/// QueryStudy - typed query catalog over a team/member schema
#[derive(Parser)]
#[command(name = "querystudy")]
#[command(about = "QueryStudy - typed query catalog over a team/member schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database DSN (overrides config)
    #[arg(long)]
    dsn: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands that need a migrated database. An in-memory database is seeded first.
#[derive(Subcommand)]
enum QueryCommand {
    /// Insert the sample teams and members
    Seed,
    /// List every member ordered by id
    List,
    /// Members matching every given field
    Search {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        age: Option<i32>,
    },
    /// One member together with its team
    Show { username: String },
    /// Average member age per team
    Teams,
    /// Count, sum, average, max and min of member ages
    Stats,
    /// Members ordered by username descending, one page at a time
    Page {
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (QUERYSTUDY__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.dsn.as_deref());

    logging::init(&config.logging.level, cli.verbose);

    if cli.print_config {
        println!("{}", config.to_redacted_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config),
        Commands::Query(command) => run_query(command, &config).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_redacted_json()?);
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<DbHandle> {
    let db = build_db_handle(config.database.clone()).await?;
    Migrator::up(db.conn(), None).await?;
    tracing::info!(dsn = db.dsn(), engine = ?db.engine(), "Database ready");
    Ok(db)
}

async fn run_query(command: QueryCommand, config: &AppConfig) -> Result<()> {
    let db = Arc::new(connect(config).await?);
    let service = MembersService::new(
        Arc::clone(&db),
        Arc::new(OrmMembersRepository::new()),
        ServiceConfig::from(&config.members),
    );

    if db.is_in_memory() && !matches!(command, QueryCommand::Seed) {
        tracing::info!("In-memory database, loading sample data");
        service.seed_sample_data().await?;
    }

    match command {
        QueryCommand::Seed => print_json(&service.seed_sample_data().await?),
        QueryCommand::List => print_json(&service.list_members().await?),
        QueryCommand::Search { username, age } => {
            let cond = MemberSearchCondition { username, age };
            print_json(&service.search(&cond).await?)
        }
        QueryCommand::Show { username } => print_json(&service.get_member(&username).await?),
        QueryCommand::Teams => print_json(&aggregate::average_age_per_team(db.conn()).await?),
        QueryCommand::Stats => print_json(&aggregate::age_stats(db.conn()).await?),
        QueryCommand::Page { offset, limit } => {
            let page = sorting::page_results_by_username_desc(db.conn(), offset, limit)
                .await?
                .map(Member::from);
            print_json(&page)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
