/// Error types for reconciliation and seeding
///
/// Database errors coming back from an insert are classified so callers can
/// tell a constraint violation (duplicate CPF, bad e-mail, dangling report
/// reference) from a lost connection.
///
/// # Example
///
/// ```
/// use tasktrack_shared::error::{SeedError, ViolationKind};
///
/// let err = SeedError::ConstraintViolation {
///     kind: ViolationKind::Unique,
///     constraint: Some("user_email_key".to_string()),
///     message: "duplicate key value violates unique constraint".to_string(),
/// };
/// assert!(err.is_constraint_violation());
/// ```

use crate::auth::HashingError;
use sqlx::error::ErrorKind;
use std::fmt;

/// Result alias used throughout the crate
pub type SeedResult<T> = Result<T, SeedError>;

/// Which storage-level constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::Unique => "unique",
            ViolationKind::ForeignKey => "foreign key",
            ViolationKind::Check => "check",
            ViolationKind::NotNull => "not null",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Database unreachable or credentials rejected
    #[error("Unable to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    /// A schema change could not be applied
    #[error("Schema reconciliation failed at `{statement}`: {source}")]
    Reconcile {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    /// Input rejected before reaching the database
    #[error("Validation failed for {entity} `{key}`: {message}")]
    Validation {
        entity: &'static str,
        key: String,
        message: String,
    },

    /// Credential could not be hashed
    #[error("Failed to hash credential for user `{key}`: {source}")]
    Hashing {
        key: String,
        #[source]
        source: HashingError,
    },

    /// Write rejected by a unique, foreign-key, check or not-null constraint
    #[error("{kind} constraint violation{}: {message}", on_constraint(.constraint))]
    ConstraintViolation {
        kind: ViolationKind,
        constraint: Option<String>,
        message: String,
    },

    /// Any other database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Seed dataset file could not be read or parsed
    #[error("Invalid seed dataset: {0}")]
    Dataset(String),

    /// A task refers to a user or report key that is not in the dataset
    #[error("Unknown {entity} key `{key}`")]
    UnresolvedKey { entity: &'static str, key: String },

    /// The same key is used twice within one entity batch
    #[error("Duplicate {entity} key `{key}`")]
    DuplicateKey { entity: &'static str, key: String },

    /// The database returned a different number of rows than were inserted
    #[error("Batch insert of {entity} returned {returned} rows for {expected} inputs")]
    BatchMismatch {
        entity: &'static str,
        expected: usize,
        returned: usize,
    },
}

fn on_constraint(constraint: &Option<String>) -> String {
    match constraint {
        Some(name) => format!(" on `{}`", name),
        None => String::new(),
    }
}

impl SeedError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, SeedError::ConstraintViolation { .. })
    }

    /// Kind of violated constraint, if this is a constraint violation
    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            SeedError::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for SeedError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db| {
            let kind = match db.kind() {
                ErrorKind::UniqueViolation => ViolationKind::Unique,
                ErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
                ErrorKind::CheckViolation => ViolationKind::Check,
                ErrorKind::NotNullViolation => ViolationKind::NotNull,
                _ => return None,
            };

            Some(SeedError::ConstraintViolation {
                kind,
                constraint: db.constraint().map(str::to_string),
                message: db.message().to_string(),
            })
        });

        match classified {
            Some(violation) => violation,
            None => SeedError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_display() {
        let err = SeedError::ConstraintViolation {
            kind: ViolationKind::ForeignKey,
            constraint: Some("tarefa_relatorioId_fkey".to_string()),
            message: "insert or update violates foreign key constraint".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "foreign key constraint violation on `tarefa_relatorioId_fkey`: \
             insert or update violates foreign key constraint"
        );
        assert_eq!(err.violation_kind(), Some(ViolationKind::ForeignKey));
    }

    #[test]
    fn test_constraint_violation_display_without_name() {
        let err = SeedError::ConstraintViolation {
            kind: ViolationKind::Unique,
            constraint: None,
            message: "duplicate".to_string(),
        };
        assert_eq!(err.to_string(), "unique constraint violation: duplicate");
    }

    #[test]
    fn test_non_database_sqlx_error_is_not_a_violation() {
        let err: SeedError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SeedError::Database(_)));
        assert!(!err.is_constraint_violation());
        assert!(err.violation_kind().is_none());
    }
}
