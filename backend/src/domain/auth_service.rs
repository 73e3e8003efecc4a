//! Authentication service implementing the [`AuthCommand`] driving port.
//!
//! Password hashing runs on the blocking thread pool; token signing is cheap
//! and stays on the executor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthCommand, NewUserRecord, PasswordHasher, TokenError, TokenService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AuthenticatedUser, Error, LoginCredentials, Registration, Role, TokenKind, TokenPair, User,
    UserId,
};

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::conflict("username already exists")
        }
    }
}

fn map_issue_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue token: {error}"))
}

/// Registration, login, and token service backed by driven ports.
#[derive(Clone)]
pub struct AuthService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AuthService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H, T> AuthService<U, H, T>
where
    H: PasswordHasher + 'static,
    T: TokenService,
{
    fn issue_pair(&self, user_id: UserId, role: Role) -> Result<TokenPair, Error> {
        let access_token = self
            .tokens
            .issue(user_id, role, TokenKind::Access)
            .map_err(map_issue_error)?;
        let refresh_token = self
            .tokens
            .issue(user_id, role, TokenKind::Refresh)
            .map_err(map_issue_error)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            role,
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
    }
}

#[async_trait]
impl<U, H, T> AuthCommand for AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self.hash_password(registration.password()).await?;
        let record = NewUserRecord {
            username: registration.username().clone(),
            password_hash,
            role: registration.role(),
        };
        let user = self.users.create(&record).await.map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<TokenPair, Error> {
        let record = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?;
        let Some(record) = record else {
            debug!("login rejected: unknown username");
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !self
            .verify_password(credentials.password(), record.password_hash)
            .await?
        {
            debug!(user_id = %record.user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized("invalid credentials"));
        }
        self.issue_pair(record.user.id, record.user.role)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let rejected = || Error::unauthorized("invalid or expired refresh token");
        let claims = self
            .tokens
            .verify(refresh_token.trim(), TokenKind::Refresh)
            .map_err(|err| {
                debug!(error = %err, "refresh token rejected");
                rejected()
            })?;
        let caller = claims.authenticated_user().ok_or_else(rejected)?;
        self.issue_pair(caller.user_id, caller.role)
    }

    fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, Error> {
        let claims = self
            .tokens
            .verify(access_token, TokenKind::Access)
            .map_err(|err| match err {
                TokenError::Expired => Error::unauthorized("token has expired"),
                other => {
                    debug!(error = %other, "access token rejected");
                    Error::unauthorized("invalid token")
                }
            })?;
        claims
            .authenticated_user()
            .ok_or_else(|| Error::unauthorized("invalid token payload"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the authentication service.
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
    use crate::domain::{Claims, ErrorCode, UserCredentialsRecord, Username};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn user(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id).expect("valid id"),
            username: Username::new("alice").expect("valid username"),
            role,
        }
    }

    fn token_service() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|id, _, kind| Ok(format!("{kind}-{id}")));
        tokens
    }

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenService,
    ) -> AuthService<MockUserRepository, MockPasswordHasher, MockTokenService> {
        AuthService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    #[tokio::test]
    async fn register_hashes_password_and_stores_user() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .with(eq("s3cret"))
            .times(1)
            .returning(|_| Ok("hashed".to_owned()));
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|record| record.password_hash == "hashed" && record.role == Role::Manager)
            .times(1)
            .returning(|_| Ok(user(3, Role::Manager)));

        let registration =
            Registration::try_from_parts("alice", "s3cret", Some("manager")).expect("valid");
        let created = service(users, hasher, MockTokenService::new())
            .register(registration)
            .await
            .expect("registration succeeds");
        assert_eq!(created.role, Role::Manager);
    }

    #[rstest]
    #[case(UserPersistenceError::duplicate_username("alice"), ErrorCode::Conflict)]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn register_maps_repository_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("hashed".to_owned()));
        let mut users = MockUserRepository::new();
        users.expect_create().return_once(move |_| Err(failure));

        let registration = Registration::try_from_parts("alice", "pw", None).expect("valid");
        let err = service(users, hasher, MockTokenService::new())
            .register(registration)
            .await
            .expect_err("repository failure surfaces");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn login_issues_token_pair() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| {
            Ok(Some(UserCredentialsRecord {
                user: user(5, Role::Staff),
                password_hash: "hashed".to_owned(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|password, _| password == "pw");

        let creds = LoginCredentials::try_from_parts("alice", "pw").expect("valid");
        let pair = service(users, hasher, token_service())
            .login(creds)
            .await
            .expect("login succeeds");
        assert_eq!(pair.access_token, "access-5");
        assert_eq!(pair.refresh_token, "refresh-5");
        assert_eq!(pair.role, Role::Staff);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn login_rejects_unknown_user_or_bad_password(#[case] user_exists: bool) {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(move |_| {
            Ok(user_exists.then(|| UserCredentialsRecord {
                user: user(5, Role::Staff),
                password_hash: "hashed".to_owned(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| false);

        let creds = LoginCredentials::try_from_parts("alice", "wrong").expect("valid");
        let err = service(users, hasher, MockTokenService::new())
            .login(creds)
            .await
            .expect_err("login rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[tokio::test]
    async fn refresh_reissues_from_claims() {
        let mut tokens = token_service();
        tokens
            .expect_verify()
            .with(eq("refresh-9"), eq(TokenKind::Refresh))
            .returning(|_, _| {
                Ok(Claims {
                    sub: "9".to_owned(),
                    role: Role::Admin,
                    iat: 0,
                    exp: 1,
                    typ: TokenKind::Refresh,
                })
            });
        let pair = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
            .refresh(" refresh-9 ")
            .await
            .expect("refresh succeeds");
        assert_eq!(pair.access_token, "access-9");
        assert_eq!(pair.role, Role::Admin);
    }

    #[rstest]
    #[case(TokenError::wrong_kind("refresh"))]
    #[case(TokenError::Expired)]
    #[case(TokenError::invalid("bad signature"))]
    #[tokio::test]
    async fn refresh_rejects_unverified_tokens(#[case] failure: TokenError) {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().return_once(move |_, _| Err(failure));
        let err = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
            .refresh("whatever")
            .await
            .expect_err("refresh rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid or expired refresh token");
    }

    #[rstest]
    #[case(TokenError::Expired, "token has expired")]
    #[case(TokenError::invalid("garbage"), "invalid token")]
    fn authenticate_maps_token_errors(#[case] failure: TokenError, #[case] message: &str) {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().return_once(move |_, _| Err(failure));
        let err = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
            .authenticate("token")
            .expect_err("token rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }
}
