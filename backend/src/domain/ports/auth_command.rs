//! Driving port for registration, login, and token handling.
//!
//! Inbound adapters call this port to authenticate without importing the
//! persistence or token infrastructure, so handler tests can substitute a
//! test double.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedUser, Error, LoginCredentials, Registration, Role, TokenPair, User, UserId,
};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create a user account. Fails with `conflict` for taken usernames.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and issue an access and refresh token.
    async fn login(&self, credentials: LoginCredentials) -> Result<TokenPair, Error>;

    /// Exchange a refresh token for a fresh token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error>;

    /// Verify a bearer access token.
    fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, Error>;
}

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";
/// Access token accepted by [`FixtureAuthCommand`].
pub const FIXTURE_ACCESS_TOKEN: &str = "fixture-access-token";
const FIXTURE_REFRESH_TOKEN: &str = "fixture-refresh-token";

/// In-memory authenticator used when no database is configured.
///
/// `admin` / `password` logs in as user 1 with the admin role.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthCommand;

impl FixtureAuthCommand {
    fn fixture_user() -> Result<AuthenticatedUser, Error> {
        UserId::new(1)
            .map(|id| AuthenticatedUser::new(id, Role::Admin))
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: FIXTURE_ACCESS_TOKEN.to_owned(),
            refresh_token: FIXTURE_REFRESH_TOKEN.to_owned(),
            role: Role::Admin,
        }
    }
}

#[async_trait]
impl AuthCommand for FixtureAuthCommand {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let id = UserId::new(1).map_err(|err| Error::internal(err.to_string()))?;
        Ok(User {
            id,
            username: registration.username().clone(),
            role: registration.role(),
        })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<TokenPair, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            Ok(Self::tokens())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        if refresh_token == FIXTURE_REFRESH_TOKEN {
            Ok(Self::tokens())
        } else {
            Err(Error::unauthorized("invalid or expired refresh token"))
        }
    }

    fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, Error> {
        if access_token == FIXTURE_ACCESS_TOKEN {
            Self::fixture_user()
        } else {
            Err(Error::unauthorized("invalid or expired token"))
        }
    }
}
