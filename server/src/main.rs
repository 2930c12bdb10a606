use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use directory::MemoryStore;
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, SqlStore, connect};
use platform_obs::{TracingConfig, init_tracing};
use tracing::info;

use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
    seed,
};

#[derive(Parser, Debug)]
#[command(name = "staffdir-server", version, about = "Staffdir employee directory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Seed the demo organization into the database.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Serve from an in-memory store pre-seeded with the demo org.
    #[arg(long)]
    in_memory: bool,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(TracingConfig::from_env("staffdir-server"))?;
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed => run_seed().await,
    }
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env();
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let serve_config = ServeConfig::new(cmd.host, cmd.port);
    if cmd.in_memory {
        info!("running with the in-memory store; nothing is persisted");
        let store = Arc::new(MemoryStore::new());
        seed::seed_demo_org(store.as_ref()).await?;
        let state = AppState::new(store.clone(), store, None, config);
        return http::serve(serve_config, state).await;
    }

    let pool = setup_pool().await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let store = Arc::new(SqlStore::new(pool.clone()));
    let state = AppState::new(store.clone(), store, Some(pool), config);
    http::serve(serve_config, state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `staffdir-server migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    let store = SqlStore::new(pool);
    seed::seed_demo_org(&store).await?;
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
