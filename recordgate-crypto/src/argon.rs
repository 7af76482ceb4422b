//! Argon2id password hashing.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the parameters and salt used travel with the stored value.

use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use tracing::warn;

use crate::error::{HashError, HashResult};
use crate::hasher::PasswordHasher;

/// Size of the random salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Argon2 cost parameters.
///
/// Default values are tuned for a balance of security and performance
/// on modern hardware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    fn to_argon2(&self) -> HashResult<Params> {
        Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))
    }
}

/// Argon2id implementation of [`PasswordHasher`].
#[derive(Clone)]
pub struct Argon2Hasher {
    params: HashParams,
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Creates a hasher with the given cost parameters.
    ///
    /// Fails if the parameters are outside what Argon2 accepts.
    pub fn new(params: HashParams) -> HashResult<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);
        Ok(Self { params, argon2 })
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    fn random_salt() -> HashResult<SaltString> {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        SaltString::encode_b64(&bytes).map_err(|e| HashError::Hashing(e.to_string()))
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        // `HashParams::default()` matches the argon2 crate defaults.
        Self {
            params: HashParams::default(),
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("params", &self.params)
            .finish()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> HashResult<String> {
        let salt = Self::random_salt()?;
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> HashResult<bool> {
        let parsed =
            PasswordHash::new(hashed).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Verification(e.to_string())),
        }
    }

    fn needs_rehash(&self, hashed: &str) -> bool {
        let parsed = match PasswordHash::new(hashed) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is not a PHC string");
                return true;
            }
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.memory_cost
                    || stored.t_cost() != self.params.time_cost
                    || stored.p_cost() != self.params.parallelism
            }
            Err(_) => true,
        }
    }
}
