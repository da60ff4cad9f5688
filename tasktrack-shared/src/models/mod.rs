/// Database models for TaskTrack
///
/// Each model has a row type (what the database returns), a creation input,
/// and a batch insert that writes many rows in one statement and returns them
/// with their generated identifiers.
///
/// # Models
///
/// - `user`: people, with a credential hashed before first persistence
/// - `report`: reports that own tasks
/// - `task`: tasks, each referencing its owning report
///
/// Insert statements are built from the declarations in [`crate::schema`], so
/// the column list written here is always the declared one.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::{CredentialHasher, HashingConfig};
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasktrack_shared::models::user::{NewUser, User};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let hasher = CredentialHasher::new(HashingConfig::default())?;
///
/// let prepared = NewUser {
///     nome: "Ana Souza".to_string(),
///     cpf: "123.456.789-00".to_string(),
///     setor: "TI".to_string(),
///     email: "ana.souza@example.com".to_string(),
///     senha: "senhaAna123".to_string(),
/// }
/// .prepare(&hasher)?;
///
/// let mut conn = pool.acquire().await?;
/// let users = User::insert_batch(&mut conn, &[prepared]).await?;
/// println!("Created user: {}", users[0].id);
/// # Ok(())
/// # }
/// ```

pub mod report;
pub mod task;
pub mod user;

use crate::schema::{quote_ident, Table};

/// `INSERT INTO "table" ("c1", "c2", ...) ` over every non-key column, in declared order
pub(crate) fn insert_prefix(table: &Table) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !c.is_primary_key())
        .map(|c| quote_ident(c.name))
        .collect();

    format!(
        "INSERT INTO {} ({}) ",
        quote_ident(table.name),
        columns.join(", ")
    )
}

/// ` RETURNING "c1", "c2", ...` over every declared column
pub(crate) fn returning_clause(table: &Table) -> String {
    let columns: Vec<String> = table.columns.iter().map(|c| quote_ident(c.name)).collect();
    format!(" RETURNING {}", columns.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{REPORT, TASK, USER};

    #[test]
    fn test_insert_prefix_skips_generated_id() {
        assert_eq!(
            insert_prefix(&USER),
            "INSERT INTO \"user\" (\"nome\", \"cpf\", \"setor\", \"email\", \"senha\") "
        );
        assert_eq!(
            insert_prefix(&TASK),
            "INSERT INTO \"tarefa\" (\"nome\", \"descricao\", \"data\", \"responsaveis\", \"setor\", \"relatorioId\") "
        );
    }

    #[test]
    fn test_returning_clause_includes_id() {
        assert_eq!(
            returning_clause(&REPORT),
            " RETURNING \"id\", \"finalidade\", \"data\", \"descricao\", \"componentes\""
        );
    }
}
