//! Registration, login, and token refresh handlers.
//!
//! ```text
//! POST /auth/register {"username":"alice","password":"pw","role":"manager"}
//! POST /auth/login {"username":"alice","password":"pw"}
//! POST /auth/refresh {"refresh_token":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Registration, Role, TokenPair};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    json_body, map_login_validation_error, map_user_validation_error, missing_field_error,
};

/// Request body for `POST /auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    pub password: Option<String>,
    /// `admin`, `manager`, or `staff` (default).
    #[schema(example = "staff")]
    pub role: Option<String>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub role: Role,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Create a user account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: Result<web::Json<RegisterRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let request = json_body(payload)?;
    let username = required(request.username, "username")?;
    let password = required(request.password, "password")?;
    let registration = Registration::try_from_parts(&username, &password, request.role.as_deref())
        .map_err(map_user_validation_error)?;
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: format!("User {} created successfully", user.username),
        role: user.role,
    }))
}

/// Exchange credentials for an access and refresh token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenPair),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: Result<web::Json<LoginRequest>, actix_web::Error>,
) -> ApiResult<web::Json<TokenPair>> {
    let request = json_body(payload)?;
    let username = required(request.username, "username")?;
    let password = required(request.password, "password")?;
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;
    let tokens = state.auth.login(credentials).await?;
    Ok(web::Json(tokens))
}

/// Issue a fresh token pair from a refresh token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid or expired refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    payload: Result<web::Json<RefreshRequest>, actix_web::Error>,
) -> ApiResult<web::Json<TokenPair>> {
    let request = json_body(payload)?;
    let token = request
        .refresh_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| missing_field_error("refresh_token"))?;
    let tokens = state.auth.refresh(token.trim()).await?;
    Ok(web::Json(tokens))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockAuthCommand;
    use crate::domain::{User, UserId};
    use crate::inbound::http::test_utils::{app_with_state, error_code};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn auth_scope() -> actix_web::Scope {
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(refresh)
    }

    async fn post_json(state: HttpState, uri: &str, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(app_with_state(state).service(auth_scope())).await;
        let req = actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        let body = actix_test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn register_creates_a_staff_user_by_default() {
        let mut auth = MockAuthCommand::new();
        auth.expect_register()
            .withf(|registration| registration.role() == Role::Staff)
            .times(1)
            .return_once(|registration| {
                Ok(User {
                    id: UserId::new(5).expect("valid id"),
                    username: registration.username().clone(),
                    role: registration.role(),
                })
            });
        let state = HttpState {
            auth: Arc::new(auth),
            ..HttpState::fixtures()
        };

        let (status, body) = post_json(
            state,
            "/auth/register",
            json!({"username": " bob ", "password": "pw"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"message": "User bob created successfully", "role": "staff"})
        );
    }

    #[actix_web::test]
    async fn register_surfaces_conflicts() {
        let mut auth = MockAuthCommand::new();
        auth.expect_register()
            .return_once(|_| Err(Error::conflict("username already exists")));
        let state = HttpState {
            auth: Arc::new(auth),
            ..HttpState::fixtures()
        };

        let (status, body) = post_json(
            state,
            "/auth/register",
            json!({"username": "bob", "password": "pw"}),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), Some("conflict"));
    }

    #[rstest]
    #[case(json!({"password": "pw"}), "username")]
    #[case(json!({"username": "   ", "password": "pw"}), "username")]
    #[case(json!({"username": "bob"}), "password")]
    #[case(json!({"username": "bob", "password": "pw", "role": "owner"}), "role")]
    #[actix_web::test]
    async fn register_rejects_invalid_input(#[case] payload: Value, #[case] field: &str) {
        let mut auth = MockAuthCommand::new();
        auth.expect_register().never();
        let state = HttpState {
            auth: Arc::new(auth),
            ..HttpState::fixtures()
        };

        let (status, body) = post_json(state, "/auth/register", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn login_returns_tokens_for_fixture_account() {
        let (status, body) = post_json(
            HttpState::fixtures(),
            "/auth/login",
            json!({"username": "admin", "password": "password"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");
        assert!(body["access_token"].is_string());
        assert!(body["refresh_token"].is_string());
    }

    #[rstest]
    #[case(json!({"username": "admin", "password": "nope"}), StatusCode::UNAUTHORIZED)]
    #[case(json!({"username": "admin", "password": ""}), StatusCode::BAD_REQUEST)]
    #[case(json!({"username": "admin"}), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn login_failures(#[case] payload: Value, #[case] expected: StatusCode) {
        let (status, _) = post_json(HttpState::fixtures(), "/auth/login", payload).await;
        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = actix_test::init_service(app_with_state(HttpState::fixtures()).service(auth_scope()))
            .await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn refresh_passes_the_trimmed_token() {
        let mut auth = MockAuthCommand::new();
        auth.expect_refresh()
            .withf(|token: &str| token == "abc")
            .return_once(|_| {
                Ok(TokenPair {
                    access_token: "a2".to_owned(),
                    refresh_token: "r2".to_owned(),
                    role: Role::Manager,
                })
            });
        let state = HttpState {
            auth: Arc::new(auth),
            ..HttpState::fixtures()
        };

        let (status, body) =
            post_json(state, "/auth/refresh", json!({"refresh_token": " abc "})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"access_token": "a2", "refresh_token": "r2", "role": "manager"})
        );
    }

    #[rstest]
    #[case(json!({}), StatusCode::BAD_REQUEST)]
    #[case(json!({"refresh_token": "stale"}), StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn refresh_failures(#[case] payload: Value, #[case] expected: StatusCode) {
        let (status, _) = post_json(HttpState::fixtures(), "/auth/refresh", payload).await;
        assert_eq!(status, expected);
    }
}
