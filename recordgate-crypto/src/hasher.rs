//! Abstract one-way hashing interface.
//!
//! Records depend on `Arc<dyn PasswordHasher>` and never pick an algorithm
//! themselves. [`crate::Argon2Hasher`] is the production implementation.

use crate::error::HashResult;

/// Trait for turning plaintext secrets into one-way digests.
///
/// Implementations must produce output of a fixed length for fixed
/// parameters, and the output must not reveal the plaintext.
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext`, returning an encoded digest suitable for storage.
    fn hash(&self, plaintext: &str) -> HashResult<String>;

    /// Check `plaintext` against a digest produced by `hash`.
    ///
    /// A wrong password is `Ok(false)`, not an error.
    fn verify(&self, plaintext: &str, hashed: &str) -> HashResult<bool>;

    /// Whether `hashed` was produced with different settings than this
    /// hasher currently uses and should be recomputed on next login.
    fn needs_rehash(&self, hashed: &str) -> bool {
        let _ = hashed;
        false
    }
}
