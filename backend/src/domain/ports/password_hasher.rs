//! Port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed, for example because parameters were rejected.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Port for producing and checking password hashes.
///
/// Hashing is CPU-bound and synchronous; callers run it off the async
/// executor when it matters.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string (PHC format).
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
