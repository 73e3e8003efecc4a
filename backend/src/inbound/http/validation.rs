//! Shared validation helpers for inbound HTTP adapters.

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    DocumentValidationError, Error, LoginValidationError, ProductId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    TooLong,
    InvalidRole,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidJson => "invalid_json",
        }
    }
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

/// Unwrap a JSON body, reporting malformed payloads as `invalid_request`.
///
/// Handlers take the extractor result rather than `web::Json<T>` directly so
/// access checks can run before the body is judged.
pub(crate) fn json_body<T>(payload: Result<web::Json<T>, actix_web::Error>) -> Result<T, Error> {
    payload.map(web::Json::into_inner).map_err(|err| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request("invalid or missing JSON body")
            .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
    })
}

/// Product ids in paths must be positive; anything else cannot exist.
pub(crate) fn parse_product_id(raw: i32) -> Result<ProductId, Error> {
    ProductId::new(raw).map_err(|_| Error::not_found("product not found"))
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, ErrorCode::EmptyField, err.to_string())
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyUsername => ("username", ErrorCode::EmptyField),
        UserValidationError::UsernameTooLong { .. } => ("username", ErrorCode::TooLong),
        UserValidationError::EmptyPassword => ("password", ErrorCode::EmptyField),
        UserValidationError::InvalidRole => ("role", ErrorCode::InvalidRole),
        UserValidationError::InvalidId => {
            return Error::internal(err.to_string());
        }
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn map_document_validation_error(err: DocumentValidationError) -> Error {
    let (field, code) = match err {
        DocumentValidationError::EmptyFilename => ("filename", ErrorCode::EmptyField),
        DocumentValidationError::FilenameTooLong { .. } => ("filename", ErrorCode::TooLong),
        DocumentValidationError::ContentTypeTooLong { .. } => {
            ("content_type", ErrorCode::TooLong)
        }
        DocumentValidationError::EmptyText => ("text", ErrorCode::EmptyField),
    };
    field_error(field, code, err.to_string())
}
