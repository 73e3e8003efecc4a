//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::ports::FIXTURE_ACCESS_TOKEN;
use crate::inbound::http::state::HttpState;

/// `Authorization` header accepted by the fixture authenticator.
pub fn fixture_bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {FIXTURE_ACCESS_TOKEN}"))
}

/// Build an app wrapped in [`Trace`] with `state` registered.
pub fn app_with_state(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).wrap(Trace)
}

/// Read the `code` field of an error body.
pub fn error_code(body: &Value) -> Option<&str> {
    body.get("code").and_then(Value::as_str)
}
