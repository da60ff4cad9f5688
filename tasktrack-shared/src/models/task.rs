/// Task model and batch creation
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tarefa (
///     id SERIAL PRIMARY KEY,
///     nome VARCHAR(255),
///     descricao TEXT,
///     data TIMESTAMPTZ,
///     responsaveis VARCHAR(255),
///     setor VARCHAR(255),
///     "relatorioId" INTEGER REFERENCES relatorio (id)
/// );
/// ```
///
/// `responsaveis` is a display string ("Ana Souza, Maria Fernanda"), not a
/// relation to users. `setor` is copied from the first responsible user when
/// the task is created.

use crate::error::SeedResult;
use crate::models::{insert_prefix, returning_clause};
use crate::schema::TASK;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, Postgres, QueryBuilder};

/// Separator between display names in `responsaveis`
pub const RESPONSIBLE_SEPARATOR: &str = ", ";

/// Persisted task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub data: DateTime<Utc>,
    pub responsaveis: String,
    pub setor: String,

    /// Owning report
    #[sqlx(rename = "relatorioId")]
    #[serde(rename = "relatorioId")]
    pub relatorio_id: i32,
}

/// Input for creating a task whose report already exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub nome: String,
    pub descricao: String,
    pub data: DateTime<Utc>,
    pub responsaveis: String,
    pub setor: String,
    #[serde(rename = "relatorioId")]
    pub relatorio_id: i32,
}

/// Renders display names the way `responsaveis` stores them
pub fn join_responsibles<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .collect::<Vec<_>>()
        .join(RESPONSIBLE_SEPARATOR)
}

impl Task {
    /// Inserts all tasks in one statement
    ///
    /// # Returns
    ///
    /// The created rows, in input order, with generated ids
    ///
    /// # Errors
    ///
    /// Returns `SeedError::ConstraintViolation` with
    /// `ViolationKind::ForeignKey` if a `relatorio_id` does not name an
    /// existing report.
    pub async fn insert_batch(conn: &mut PgConnection, tasks: &[NewTask]) -> SeedResult<Vec<Self>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix(&TASK));
        builder.push_values(tasks, |mut row, task| {
            row.push_bind(task.nome.clone())
                .push_bind(task.descricao.clone())
                .push_bind(task.data)
                .push_bind(task.responsaveis.clone())
                .push_bind(task.setor.clone())
                .push_bind(task.relatorio_id);
        });
        builder.push(returning_clause(&TASK));

        let created = builder
            .build_query_as::<Task>()
            .fetch_all(&mut *conn)
            .await?;

        Ok(created)
    }
}
