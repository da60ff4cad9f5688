/// Seeding of the initial users, reports and tasks
///
/// # Modules
///
/// - `dataset`: the records to insert, linked to each other by seed-local keys
/// - `keyed`: inserted rows indexed by the key of the record that produced them
/// - `loader`: reconcile, then insert users, reports and tasks in that order
///
/// Tasks never refer to users or reports by position. Each user and report in
/// the dataset carries a `key`; after a batch is inserted its rows are paired
/// with those keys, and tasks resolve their references through them.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::{CredentialHasher, HashingConfig};
/// use tasktrack_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
/// use tasktrack_shared::seed::{Dataset, SeedLoader};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let hasher = CredentialHasher::new(HashingConfig::default())?;
/// let dataset = Dataset::builtin()?;
///
/// let summary = SeedLoader::new(&dataset, &hasher).run(&pool).await;
/// close_pool(pool).await;
/// println!("Inserted {} tasks", summary?.tasks.len());
/// # Ok(())
/// # }
/// ```

pub mod dataset;
pub mod keyed;
pub mod loader;

pub use dataset::{Dataset, SeedReport, SeedTask, SeedUser};
pub use keyed::Keyed;
pub use loader::{SeedLoader, SeedMode, SeedSummary};
