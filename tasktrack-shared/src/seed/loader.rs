/// Ordered batch loader
///
/// A run is strictly sequential:
///
/// ```text
/// reconcile → validate dataset → users → reports → tasks
/// ```
///
/// Each batch is one INSERT statement; the next batch is built only from the
/// rows the previous one returned.
///
/// # Commit policy
///
/// - [`SeedMode::PerBatch`] (default): every batch commits on its own. If the
///   task batch fails, the users and reports already inserted stay.
/// - [`SeedMode::Atomic`]: all three batches share one transaction and a
///   failure anywhere leaves no seed rows behind.
///
/// Re-running against an already seeded database fails on the unique CPF and
/// e-mail indexes; clearing the data first is up to the operator.

use crate::auth::CredentialHasher;
use crate::db::reconcile::{reconcile, ReconcileReport};
use crate::error::SeedResult;
use crate::models::report::{NewReport, Report};
use crate::models::task::{NewTask, Task};
use crate::models::user::{PreparedUser, User};
use crate::seed::dataset::Dataset;
use crate::seed::keyed::Keyed;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

/// How batches are grouped into transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// One transaction per batch
    #[default]
    PerBatch,

    /// One transaction for the whole run
    Atomic,
}

/// Rows created by a successful run
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub reconcile: ReconcileReport,
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    pub tasks: Vec<Task>,
}

/// Inserts one [`Dataset`] into a reconciled database
#[derive(Debug, Clone)]
pub struct SeedLoader<'a> {
    dataset: &'a Dataset,
    hasher: &'a CredentialHasher,
    mode: SeedMode,
}

impl<'a> SeedLoader<'a> {
    pub fn new(dataset: &'a Dataset, hasher: &'a CredentialHasher) -> Self {
        Self {
            dataset,
            hasher,
            mode: SeedMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: SeedMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reconciles the schema, then inserts users, reports and tasks
    ///
    /// # Errors
    ///
    /// - `SeedError::Connection` / `SeedError::Reconcile` before any insert
    /// - `SeedError::Validation`, `SeedError::DuplicateKey` or
    ///   `SeedError::UnresolvedKey` if the dataset is inconsistent, also
    ///   before any insert
    /// - `SeedError::Hashing` if a credential cannot be hashed
    /// - `SeedError::ConstraintViolation` if the database rejects a batch
    pub async fn run(&self, pool: &PgPool) -> SeedResult<SeedSummary> {
        let reconcile = reconcile(pool).await?;
        self.dataset.validate()?;

        info!(
            mode = ?self.mode,
            users = self.dataset.users.len(),
            reports = self.dataset.reports.len(),
            tasks = self.dataset.tasks.len(),
            "Seeding database"
        );

        let (users, reports, tasks) = match self.mode {
            SeedMode::PerBatch => {
                let mut tx = pool.begin().await?;
                let users = self.insert_users(&mut *tx).await?;
                tx.commit().await?;

                let mut tx = pool.begin().await?;
                let reports = self.insert_reports(&mut *tx).await?;
                tx.commit().await?;

                let mut tx = pool.begin().await?;
                let tasks = self.insert_tasks(&mut *tx, &users, &reports).await?;
                tx.commit().await?;

                (users, reports, tasks)
            }
            SeedMode::Atomic => {
                let mut tx = pool.begin().await?;
                let users = self.insert_users(&mut *tx).await?;
                let reports = self.insert_reports(&mut *tx).await?;
                let tasks = self.insert_tasks(&mut *tx, &users, &reports).await?;
                tx.commit().await?;

                (users, reports, tasks)
            }
        };

        info!(
            users = users.len(),
            reports = reports.len(),
            tasks = tasks.len(),
            "All seed data inserted successfully"
        );

        Ok(SeedSummary {
            reconcile,
            users: users.into_rows(),
            reports: reports.into_rows(),
            tasks,
        })
    }

    /// Hashes each credential, then inserts all users
    async fn insert_users(&self, conn: &mut PgConnection) -> SeedResult<Keyed<User>> {
        let mut inputs = Vec::with_capacity(self.dataset.users.len());
        let mut prepared: Vec<PreparedUser> = Vec::with_capacity(self.dataset.users.len());

        for seed in &self.dataset.users {
            let user = seed.user.clone().prepare(self.hasher)?;
            inputs.push((seed.key.clone(), user.email().to_string()));
            prepared.push(user);
        }
        debug!(count = prepared.len(), "Credentials hashed");

        let rows = User::insert_batch(conn, &prepared).await?;
        info!(count = rows.len(), "Inserted users");

        Keyed::pair_by("user", inputs, rows, |user| user.email.as_str())
    }

    async fn insert_reports(&self, conn: &mut PgConnection) -> SeedResult<Keyed<Report>> {
        let (keys, inputs): (Vec<String>, Vec<NewReport>) = self
            .dataset
            .reports
            .iter()
            .map(|seed| (seed.key.clone(), seed.report.clone()))
            .unzip();

        let rows = Report::insert_batch(conn, &inputs).await?;
        info!(count = rows.len(), "Inserted reports");

        Keyed::pair("report", keys, rows)
    }

    async fn insert_tasks(
        &self,
        conn: &mut PgConnection,
        users: &Keyed<User>,
        reports: &Keyed<Report>,
    ) -> SeedResult<Vec<Task>> {
        let inputs = self
            .dataset
            .tasks
            .iter()
            .map(|task| task.resolve(users, reports))
            .collect::<SeedResult<Vec<NewTask>>>()?;

        let rows = Task::insert_batch(conn, &inputs).await?;
        info!(count = rows.len(), "Inserted tasks");

        Ok(rows)
    }
}
