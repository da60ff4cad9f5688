/// Additive schema reconciliation
///
/// Brings the live database in line with [`crate::schema`] without ever
/// dropping, truncating or altering what is already there:
///
/// 1. Verify the database answers ([`SeedError::Connection`] otherwise)
/// 2. Inspect the live schema ([`LiveSchema`])
/// 3. [`plan`] the missing tables, columns, indexes and constraints
/// 4. Apply the plan inside one transaction
///
/// Running it against an aligned database plans nothing, so reconciliation
/// is idempotent.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasktrack_shared::db::reconcile::reconcile;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let report = reconcile(&pool).await?;
/// if report.is_noop() {
///     println!("schema already up to date");
/// }
/// # Ok(())
/// # }
/// ```

use crate::db::introspect::LiveSchema;
use crate::db::pool::health_check;
use crate::error::{SeedError, SeedResult};
use crate::schema::{HasMany, Table, RELATIONSHIPS, SCHEMA};
use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use std::fmt;
use tracing::{debug, info};

/// One additive DDL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    CreateTable {
        table: &'static str,
        sql: String,
    },
    AddColumn {
        table: &'static str,
        column: &'static str,
        sql: String,
    },
    CreateIndex {
        name: String,
        sql: String,
    },
    AddConstraint {
        name: String,
        sql: String,
    },
}

impl SchemaChange {
    pub fn sql(&self) -> &str {
        match self {
            SchemaChange::CreateTable { sql, .. }
            | SchemaChange::AddColumn { sql, .. }
            | SchemaChange::CreateIndex { sql, .. }
            | SchemaChange::AddConstraint { sql, .. } => sql,
        }
    }
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaChange::CreateTable { table, .. } => write!(f, "create table {}", table),
            SchemaChange::AddColumn { table, column, .. } => {
                write!(f, "add column {}.{}", table, column)
            }
            SchemaChange::CreateIndex { name, .. } => write!(f, "create index {}", name),
            SchemaChange::AddConstraint { name, .. } => write!(f, "add constraint {}", name),
        }
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Changes applied, in order
    pub applied: Vec<SchemaChange>,
}

impl ReconcileReport {
    /// True when the live schema already matched the declaration
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn tables_created(&self) -> usize {
        self.applied
            .iter()
            .filter(|c| matches!(c, SchemaChange::CreateTable { .. }))
            .count()
    }
}

/// Computes the changes needed to make `live` contain `tables` and `relationships`
///
/// Tables come first (in the given order), each existing table followed by
/// its missing columns and, if it has none, its primary key. Then come
/// per-table unique indexes and check constraints, then foreign keys and
/// their indexes. Nothing already present in `live` is planned again.
pub fn plan(tables: &[&Table], relationships: &[HasMany], live: &LiveSchema) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    for table in tables {
        if !live.has_table(table.name) {
            changes.push(SchemaChange::CreateTable {
                table: table.name,
                sql: table.create_sql(),
            });
            continue;
        }

        for column in table.columns {
            if !live.has_column(table.name, column.name) {
                changes.push(SchemaChange::AddColumn {
                    table: table.name,
                    column: column.name,
                    sql: table.add_column_sql(column),
                });
            }
        }

        if !live.has_primary_key(table.name) {
            if let Some(pk) = table.primary_key_constraint() {
                changes.push(SchemaChange::AddConstraint {
                    sql: pk.add_sql(),
                    name: pk.name,
                });
            }
        }
    }

    for table in tables {
        for index in table.unique_indexes() {
            if !live.has_index(&index.name) {
                changes.push(SchemaChange::CreateIndex {
                    sql: index.create_sql(),
                    name: index.name,
                });
            }
        }

        for constraint in table.check_constraints() {
            if !live.has_constraint(&constraint.name) {
                changes.push(SchemaChange::AddConstraint {
                    sql: constraint.add_sql(),
                    name: constraint.name,
                });
            }
        }
    }

    for rel in relationships {
        let constraint = rel.constraint();
        if !live.has_constraint(&constraint.name) {
            changes.push(SchemaChange::AddConstraint {
                sql: constraint.add_sql(),
                name: constraint.name,
            });
        }

        let index = rel.index();
        if !live.has_index(&index.name) {
            changes.push(SchemaChange::CreateIndex {
                sql: index.create_sql(),
                name: index.name,
            });
        }
    }

    changes
}

/// Aligns the live schema with the declared tables and relationships
///
/// # Errors
///
/// - `SeedError::Connection` if the database is unreachable
/// - `SeedError::Reconcile` naming the statement that failed; the whole
///   reconciliation is rolled back
pub async fn reconcile(pool: &PgPool) -> SeedResult<ReconcileReport> {
    health_check(pool).await.map_err(SeedError::Connection)?;

    let mut tx = pool.begin().await.map_err(SeedError::Connection)?;
    let live = LiveSchema::inspect(&mut *tx).await?;
    let changes = plan(SCHEMA, RELATIONSHIPS, &live);

    if changes.is_empty() {
        tx.commit().await?;
        info!("Database schema already up to date");
        return Ok(ReconcileReport::default());
    }

    for change in &changes {
        debug!(change = %change, sql = change.sql(), "Applying schema change");

        sqlx::query(change.sql())
            .execute(&mut *tx)
            .await
            .map_err(|source| SeedError::Reconcile {
                statement: change.sql().to_string(),
                source,
            })?;
    }

    tx.commit().await?;

    let report = ReconcileReport { applied: changes };
    info!(
        changes = report.applied.len(),
        tables_created = report.tables_created(),
        "Database schema synchronized"
    );

    Ok(report)
}

/// Creates the database if it doesn't exist
///
/// # Errors
///
/// Returns an error if the server is unreachable or the role may not create
/// databases
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    debug!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
