//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Role, User, UserCredentialsRecord, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username {username} already exists",
    }
}

/// User row to insert; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its assigned id.
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError>;

    /// Fetch a user and password hash by username for login.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
