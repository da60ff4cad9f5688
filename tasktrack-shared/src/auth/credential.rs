/// Credential hashing using Argon2id
///
/// Every user credential is replaced by an Argon2id hash before the user row
/// is first written. The hash is stored in PHC string form, so the algorithm,
/// work factor and salt travel with it and verification needs nothing else.
///
/// # Work factor
///
/// - **Memory**: 19 MiB (19456 KiB)
/// - **Iterations**: 2 passes
/// - **Parallelism**: 1 lane
///
/// This is the Argon2id baseline comparable to bcrypt at cost 10. All three
/// values can be raised through [`HashingConfig`].
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::credential::{verify_credential, CredentialHasher, HashingConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(HashingConfig::default())?;
/// let hash = hasher.hash("senhaPedro456")?;
///
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(verify_credential("senhaPedro456", &hash)?);
/// assert!(!verify_credential("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Error type for credential hashing operations
#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    /// Empty credentials are never hashed
    #[error("Credential must not be empty")]
    EmptyCredential,

    /// Work factor rejected by Argon2
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash credential
    #[error("Failed to hash credential: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid credential hash format: {0}")]
    InvalidHash(String),

    /// Failed to verify credential
    #[error("Failed to verify credential: {0}")]
    VerifyError(String),
}

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes over memory
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes credentials with a fixed, validated work factor
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    config: HashingConfig,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("config", &self.config)
            .finish()
    }
}

impl CredentialHasher {
    /// Builds a hasher, rejecting work factors Argon2 does not accept
    ///
    /// # Errors
    ///
    /// Returns `HashingError::InvalidParams` if memory is below 8 KiB per lane,
    /// iterations are zero, or parallelism is zero.
    pub fn new(config: HashingConfig) -> Result<Self, HashingError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(Params::DEFAULT_OUTPUT_LEN),
        )
        .map_err(|e| HashingError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            config,
        })
    }

    pub fn config(&self) -> HashingConfig {
        self.config
    }

    /// Hashes a plaintext credential with a fresh random salt
    ///
    /// # Returns
    ///
    /// PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`
    ///
    /// # Errors
    ///
    /// - `HashingError::EmptyCredential` for an empty input
    /// - `HashingError::HashError` if Argon2 fails
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        if plaintext.is_empty() {
            return Err(HashingError::EmptyCredential);
        }

        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashingError::HashError(e.to_string()))?;

        Ok(hash.to_string())
    }
}

/// Verifies a plaintext credential against a stored PHC hash
///
/// The work factor and salt are read from the hash itself. Comparison is
/// constant-time.
///
/// # Errors
///
/// Returns `HashingError::InvalidHash` if `stored` is not a PHC string and
/// `HashingError::VerifyError` for any other Argon2 failure. A wrong
/// credential is `Ok(false)`, not an error.
pub fn verify_credential(plaintext: &str, stored: &str) -> Result<bool, HashingError> {
    let parsed = PasswordHash::new(stored).map_err(|e| HashingError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashingError::VerifyError(e.to_string())),
    }
}
