//! Port for issuing and verifying signed bearer tokens.

use crate::domain::{Claims, Role, TokenKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signing failed.
        Encode { message: String } => "token encoding failed: {message}",
        /// Signature, format, or claim validation failed.
        Invalid { message: String } => "token rejected: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// The token is valid but issued for another purpose.
        WrongKind { expected: String } => "expected {expected} token",
    }
}

/// Port for bearer token issuance and verification.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token of `kind` for the given user.
    fn issue(&self, user_id: UserId, role: Role, kind: TokenKind) -> Result<String, TokenError>;

    /// Verify `token` and require it to be of `expected` kind.
    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError>;
}
