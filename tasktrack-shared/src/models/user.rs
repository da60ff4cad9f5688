/// User model and batch creation
///
/// # Schema
///
/// ```sql
/// CREATE TABLE "user" (
///     id SERIAL PRIMARY KEY,
///     nome VARCHAR(255),
///     cpf VARCHAR(255),      -- unique index user_cpf_key
///     setor VARCHAR(255),
///     email VARCHAR(255),    -- unique index user_email_key, check user_email_check
///     senha VARCHAR(255)     -- Argon2id PHC string
/// );
/// ```
///
/// # Creation
///
/// A [`NewUser`] carries the plaintext credential. It cannot be inserted
/// directly: [`NewUser::prepare`] validates it and hashes the credential,
/// consuming the input and producing a [`PreparedUser`]. Only prepared users
/// reach [`User::insert_batch`], so the hash is applied exactly once per
/// created user and the plaintext does not outlive preparation.

use crate::auth::CredentialHasher;
use crate::error::{SeedError, SeedResult};
use crate::models::{insert_prefix, returning_clause};
use crate::schema::USER;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::fmt;
use validator::Validate;

/// Persisted user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Generated identifier
    pub id: i32,

    /// Display name
    pub nome: String,

    /// National identifier (CPF), unique across users
    pub cpf: String,

    /// Department
    pub setor: String,

    /// E-mail address, unique across users
    pub email: String,

    /// Argon2id hash of the credential
    #[serde(skip_serializing)]
    pub senha: String,
}

/// Input for creating a user, credential still in plaintext
#[derive(Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "display name must not be empty"))]
    pub nome: String,

    #[validate(length(min = 1, message = "national identifier must not be empty"))]
    pub cpf: String,

    pub setor: String,

    #[validate(email(message = "must be an address of the form local@domain"))]
    pub email: String,

    /// Plaintext credential; hashed by [`NewUser::prepare`]
    #[validate(length(min = 1, message = "credential must not be empty"))]
    pub senha: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("nome", &self.nome)
            .field("cpf", &self.cpf)
            .field("setor", &self.setor)
            .field("email", &self.email)
            .field("senha", &"<redacted>")
            .finish()
    }
}

impl NewUser {
    /// Checks field shapes without touching the database
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Validation` naming the user by e-mail.
    pub fn check(&self) -> SeedResult<()> {
        self.validate().map_err(|e| SeedError::Validation {
            entity: "user",
            key: self.email.clone(),
            message: e.to_string(),
        })
    }

    /// Validates the input and replaces the credential with its hash
    ///
    /// # Errors
    ///
    /// - `SeedError::Validation` if a field has the wrong shape
    /// - `SeedError::Hashing` if the credential cannot be hashed
    pub fn prepare(self, hasher: &CredentialHasher) -> SeedResult<PreparedUser> {
        self.check()?;

        let senha_hash = hasher.hash(&self.senha).map_err(|source| SeedError::Hashing {
            key: self.email.clone(),
            source,
        })?;

        Ok(PreparedUser {
            nome: self.nome,
            cpf: self.cpf,
            setor: self.setor,
            email: self.email,
            senha_hash,
        })
    }
}

/// Validated user whose credential has already been hashed
#[derive(Debug, Clone)]
pub struct PreparedUser {
    nome: String,
    cpf: String,
    setor: String,
    email: String,
    senha_hash: String,
}

impl PreparedUser {
    pub fn nome(&self) -> &str {
        &self.nome
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn senha_hash(&self) -> &str {
        &self.senha_hash
    }
}

impl User {
    /// Inserts all users in one statement
    ///
    /// # Returns
    ///
    /// The created rows, in input order, with generated ids
    ///
    /// # Errors
    ///
    /// - `SeedError::ConstraintViolation` for a duplicate CPF or e-mail, or
    ///   an e-mail rejected by `user_email_check`; no row of the batch is kept
    /// - `SeedError::Database` for any other database failure
    pub async fn insert_batch(
        conn: &mut PgConnection,
        users: &[PreparedUser],
    ) -> SeedResult<Vec<Self>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix(&USER));
        builder.push_values(users, |mut row, user| {
            row.push_bind(user.nome.clone())
                .push_bind(user.cpf.clone())
                .push_bind(user.setor.clone())
                .push_bind(user.email.clone())
                .push_bind(user.senha_hash.clone());
        });
        builder.push(returning_clause(&USER));

        let created = builder
            .build_query_as::<User>()
            .fetch_all(&mut *conn)
            .await?;

        Ok(created)
    }
}
