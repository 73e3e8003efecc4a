//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NewUserRecord, UserPersistenceError, UserRepository};
use crate::domain::{Role, User, UserCredentialsRecord, UserId, UserValidationError, Username};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a stored row, rejecting ids, names, or roles the domain refuses.
fn row_to_credentials(row: UserRow) -> Result<UserCredentialsRecord, UserPersistenceError> {
    let invalid = |reason: String| {
        warn!(user_id = row.id, %reason, "stored user row is invalid");
        UserPersistenceError::query(format!("invalid user row {}", row.id))
    };
    let id = UserId::new(row.id).map_err(|err| invalid(err.to_string()))?;
    let username = Username::new(&row.username).map_err(|err| invalid(err.to_string()))?;
    let role: Role = row
        .role
        .parse()
        .map_err(|err: UserValidationError| invalid(err.to_string()))?;
    Ok(UserCredentialsRecord {
        user: User { id, username, role },
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(NewUserRow {
                username: record.username.as_str(),
                password_hash: &record.password_hash,
                role: record.role.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    UserPersistenceError::duplicate_username(record.username.as_str())
                } else {
                    diesel_error(error)
                }
            })?;
        row_to_credentials(row).map(|credentials| credentials.user)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::username.eq(username.trim()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_credentials)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row_to_credentials(row).map(|credentials| credentials.user))
            .transpose()
    }
}
