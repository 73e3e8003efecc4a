//! HS256 JSON Web Token implementation of the `TokenService` port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so token lifetimes are testable.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{Claims, Role, TokenKind, UserId};

/// Signing secret and token lifetimes.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Zeroizing<String>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Issues and verifies signed access and refresh tokens.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    const fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId, role: Role, kind: TokenKind) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl(kind)).timestamp(),
            typ: kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::encode(err.to_string()))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::invalid(err.to_string()),
            })?;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        if claims.typ != expected {
            return Err(TokenError::wrong_kind(expected.as_str()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: Zeroizing::new(secret.to_owned()),
            access_ttl: Duration::minutes(60),
            refresh_ttl: Duration::days(30),
        }
    }

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::default())
    }

    fn service(clock: &Arc<MutableClock>) -> JwtTokenService {
        JwtTokenService::new(&config("test-secret"), clock.clone())
    }

    fn user() -> UserId {
        UserId::new(42).expect("valid id")
    }

    #[rstest]
    fn issued_tokens_verify_with_their_claims(clock: Arc<MutableClock>) {
        let tokens = service(&clock);
        let token = tokens
            .issue(user(), Role::Manager, TokenKind::Access)
            .expect("issue");

        let claims = tokens.verify(&token, TokenKind::Access).expect("verify");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[rstest]
    fn access_tokens_expire_after_ttl(clock: Arc<MutableClock>) {
        let tokens = service(&clock);
        let token = tokens
            .issue(user(), Role::Staff, TokenKind::Access)
            .expect("issue");

        clock.advance_seconds(3599);
        assert!(tokens.verify(&token, TokenKind::Access).is_ok());
        clock.advance_seconds(1);
        assert_eq!(
            tokens.verify(&token, TokenKind::Access),
            Err(TokenError::Expired)
        );
    }

    #[rstest]
    #[case(TokenKind::Access, TokenKind::Refresh)]
    #[case(TokenKind::Refresh, TokenKind::Access)]
    fn token_kinds_are_not_interchangeable(
        clock: Arc<MutableClock>,
        #[case] issued: TokenKind,
        #[case] expected: TokenKind,
    ) {
        let tokens = service(&clock);
        let token = tokens.issue(user(), Role::Admin, issued).expect("issue");
        assert_eq!(
            tokens.verify(&token, expected),
            Err(TokenError::wrong_kind(expected.as_str()))
        );
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected(clock: Arc<MutableClock>) {
        let foreign = JwtTokenService::new(&config("other-secret"), clock.clone());
        let token = foreign
            .issue(user(), Role::Admin, TokenKind::Access)
            .expect("issue");

        let result = service(&clock).verify(&token, TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Invalid { .. })));
    }

    #[rstest]
    fn garbage_is_rejected(clock: Arc<MutableClock>) {
        let result = service(&clock).verify("not-a-jwt", TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Invalid { .. })));
    }
}
