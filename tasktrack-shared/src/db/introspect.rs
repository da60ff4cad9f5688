/// Snapshot of the live schema
///
/// Only names are collected: which tables exist, which columns each table
/// has, which tables have a primary key, and which indexes and constraints
/// exist in the current schema. That
/// is all the reconciler needs to decide what is missing, since it never
/// alters an existing object.

use crate::error::SeedResult;
use sqlx::PgConnection;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Names of the objects that exist in `current_schema()`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSchema {
    tables: BTreeMap<String, BTreeSet<String>>,
    primary_keys: BTreeSet<String>,
    indexes: BTreeSet<String>,
    constraints: BTreeSet<String>,
}

impl LiveSchema {
    /// Reads the current schema from `information_schema` and `pg_indexes`
    ///
    /// # Errors
    ///
    /// Returns an error if any catalog query fails
    pub async fn inspect(conn: &mut PgConnection) -> SeedResult<Self> {
        let mut live = LiveSchema::default();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name::text
             FROM information_schema.tables
             WHERE table_schema = current_schema()
             AND table_type = 'BASE TABLE'",
        )
        .fetch_all(&mut *conn)
        .await?;

        for (table,) in tables {
            live.tables.entry(table).or_default();
        }

        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT table_name::text, column_name::text
             FROM information_schema.columns
             WHERE table_schema = current_schema()",
        )
        .fetch_all(&mut *conn)
        .await?;

        for (table, column) in columns {
            if let Some(existing) = live.tables.get_mut(&table) {
                existing.insert(column);
            }
        }

        let indexes: Vec<(String,)> = sqlx::query_as(
            "SELECT indexname::text FROM pg_indexes WHERE schemaname = current_schema()",
        )
        .fetch_all(&mut *conn)
        .await?;
        live.indexes = indexes.into_iter().map(|(name,)| name).collect();

        let constraints: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT table_name::text, constraint_name::text, constraint_type::text
             FROM information_schema.table_constraints
             WHERE table_schema = current_schema()",
        )
        .fetch_all(&mut *conn)
        .await?;

        for (table, name, kind) in constraints {
            if kind == "PRIMARY KEY" {
                live.primary_keys.insert(table);
            }
            live.constraints.insert(name);
        }

        debug!(
            tables = live.tables.len(),
            indexes = live.indexes.len(),
            constraints = live.constraints.len(),
            "Inspected live schema"
        );

        Ok(live)
    }

    /// Records a table and its columns
    pub fn add_table<I, S>(&mut self, table: &str, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Records that `table` has a primary key, whatever its name
    pub fn add_primary_key(&mut self, table: &str) -> &mut Self {
        self.primary_keys.insert(table.to_string());
        self
    }

    pub fn add_index(&mut self, name: &str) -> &mut Self {
        self.indexes.insert(name.to_string());
        self
    }

    pub fn add_constraint(&mut self, name: &str) -> &mut Self {
        self.constraints.insert(name.to_string());
        self
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    pub fn has_primary_key(&self, table: &str) -> bool {
        self.primary_keys.contains(table)
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains(name)
    }

    pub fn has_constraint(&self, name: &str) -> bool {
        self.constraints.contains(name)
    }

    pub fn columns(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let live = LiveSchema::default();
        assert!(!live.has_table("user"));
        assert!(!live.has_column("user", "id"));
        assert!(!live.has_index("user_cpf_key"));
        assert!(!live.has_constraint("user_email_check"));
        assert!(!live.has_primary_key("user"));
    }

    #[test]
    fn test_primary_key_is_tracked_per_table() {
        let mut live = LiveSchema::default();
        live.add_table("relatorio", ["id"]).add_primary_key("relatorio");

        assert!(live.has_primary_key("relatorio"));
        assert!(!live.has_primary_key("tarefa"));
        assert!(!live.has_constraint("relatorio_pkey"));
    }

    #[test]
    fn test_add_table_merges_columns() {
        let mut live = LiveSchema::default();
        live.add_table("relatorio", ["id", "finalidade"])
            .add_table("relatorio", ["data"]);

        assert!(live.has_table("relatorio"));
        assert!(live.has_column("relatorio", "data"));
        assert!(live.has_column("relatorio", "finalidade"));
        assert!(!live.has_column("relatorio", "componentes"));
        assert_eq!(live.columns("relatorio").map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let mut live = LiveSchema::default();
        live.add_table("tarefa", ["relatorioid"]);
        assert!(!live.has_column("tarefa", "relatorioId"));
    }
}
