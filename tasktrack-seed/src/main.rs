//! # TaskTrack Seeder
//!
//! One-shot process that prepares the TaskTrack database and loads the
//! initial users, reports and tasks.
//!
//! ## Flow
//!
//! connect → reconcile schema → insert users → insert reports → insert tasks
//!
//! The database connection is opened once and closed before the process
//! exits, on success and on failure alike.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://postgres@localhost/tasks cargo run -p tasktrack-seed
//! ```

mod config;

use config::{Config, LogFormat};
use tasktrack_shared::auth::CredentialHasher;
use tasktrack_shared::db::pool::{close_pool, create_pool};
use tasktrack_shared::db::reconcile::ensure_database_exists;
use tasktrack_shared::seed::{Dataset, SeedLoader};
use tasktrack_shared::SeedError;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "tasktrack_seed=info,tasktrack_shared=info".into()),
    );

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    let config = config.map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(
        "TaskTrack seeder v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let hasher = CredentialHasher::new(config.hashing)?;
    let dataset = match &config.seed.file {
        Some(path) => {
            info!(path = %path.display(), "Loading seed dataset");
            Dataset::from_file(path)?
        }
        None => Dataset::builtin()?,
    };

    if config.database.create_if_missing {
        ensure_database_exists(&config.database.url)
            .await
            .map_err(SeedError::Connection)?;
    }

    let pool = match create_pool(config.database_config()).await {
        Ok(pool) => pool,
        Err(e) => {
            let err = SeedError::Connection(e);
            error!(error = %err, "Seeding aborted");
            return Err(err.into());
        }
    };

    let result = SeedLoader::new(&dataset, &hasher)
        .with_mode(config.seed.mode)
        .run(&pool)
        .await;

    close_pool(pool).await;

    match result {
        Ok(summary) => {
            info!(
                schema_changes = summary.reconcile.applied.len(),
                users = summary.users.len(),
                reports = summary.reports.len(),
                tasks = summary.tasks.len(),
                "Seeding complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Error inserting seed data");
            Err(e.into())
        }
    }
}
