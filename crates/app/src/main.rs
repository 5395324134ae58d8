use std::path::Path;

use chrono::Utc;
use clap::Parser;
use ledger::{ExchangeLedger, SqliteStore};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod backup;
mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "sarraf={level},ledger={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = parse_database(&settings.storage.database).await?;
    let store = SqliteStore::new(db);
    let mut ledger = ExchangeLedger::load(&store).await?;
    let now = Utc::now();

    commands::sync(&mut ledger, &store, now).await?;
    commands::run(cli.command, &mut ledger, &store, now).await?;
    backup::run_due(
        &mut ledger,
        &store,
        Path::new(&settings.backup.directory),
        now,
    )
    .await?;

    Ok(())
}

async fn parse_database(config: &Database) -> error::Result<sea_orm::DatabaseConnection> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
