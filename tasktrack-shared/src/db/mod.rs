/// Database layer for TaskTrack
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a connectivity health check
/// - `introspect`: snapshot of the tables, columns, indexes and constraints
///   that currently exist
/// - `reconcile`: additive, idempotent alignment of the live schema with
///   [`crate::schema`]
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
/// use tasktrack_shared::db::reconcile::reconcile;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     let report = reconcile(&pool).await;
///     close_pool(pool).await;
///
///     println!("{} schema changes applied", report?.applied.len());
///     Ok(())
/// }
/// ```

pub mod introspect;
pub mod pool;
pub mod reconcile;
