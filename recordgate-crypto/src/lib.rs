//! One-way password hashing for recordgate.
//!
//! - [`PasswordHasher`]: the capability records hash through
//! - [`Argon2Hasher`]: Argon2id with PHC-encoded output and random salts
//! - [`HashParams`]: Argon2 cost settings

mod argon;
mod error;
mod hasher;

pub use argon::{Argon2Hasher, HashParams, SALT_SIZE};
pub use error::{HashError, HashResult};
pub use hasher::PasswordHasher;
