/// Credential protection
///
/// # Modules
///
/// - [`credential`]: Argon2id hashing of user credentials before first
///   persistence, plus verification against a stored hash
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::{verify_credential, CredentialHasher, HashingConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(HashingConfig::default())?;
/// let stored = hasher.hash("senhaAna123")?;
/// assert!(verify_credential("senhaAna123", &stored)?);
/// # Ok(())
/// # }
/// ```

pub mod credential;

pub use credential::{verify_credential, CredentialHasher, HashingConfig, HashingError};
