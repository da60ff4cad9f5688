/// Report model and batch creation
///
/// # Schema
///
/// ```sql
/// CREATE TABLE relatorio (
///     id SERIAL PRIMARY KEY,
///     finalidade VARCHAR(255),
///     data TIMESTAMPTZ,
///     descricao TEXT,
///     componentes TEXT
/// );
/// ```
///
/// Reports are the owning side of [`crate::schema::REPORT_TASKS`]; they must
/// exist before any task that references them is inserted.

use crate::error::SeedResult;
use crate::models::{insert_prefix, returning_clause};
use crate::schema::REPORT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, Postgres, QueryBuilder};

/// Persisted report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: i32,

    /// Purpose, e.g. "Avaliação de Desempenho"
    pub finalidade: String,

    pub data: DateTime<Utc>,

    pub descricao: String,

    /// Free-form description of what the report is made of
    pub componentes: String,
}

/// Input for creating a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub finalidade: String,
    pub data: DateTime<Utc>,
    pub descricao: String,
    pub componentes: String,
}

impl Report {
    /// Inserts all reports in one statement
    ///
    /// # Returns
    ///
    /// The created rows, in input order, with generated ids
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the statement
    pub async fn insert_batch(
        conn: &mut PgConnection,
        reports: &[NewReport],
    ) -> SeedResult<Vec<Self>> {
        if reports.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix(&REPORT));
        builder.push_values(reports, |mut row, report| {
            row.push_bind(report.finalidade.clone())
                .push_bind(report.data)
                .push_bind(report.descricao.clone())
                .push_bind(report.componentes.clone());
        });
        builder.push(returning_clause(&REPORT));

        let created = builder
            .build_query_as::<Report>()
            .fetch_all(&mut *conn)
            .await?;

        Ok(created)
    }
}
