//! Transport helpers shared by the language model adapters: sending JSON,
//! mapping timeouts and HTTP statuses, and decoding responses.

use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::LlmProviderError;

/// Resolve `path` against `base`, keeping any path prefix on `base`.
pub(super) fn endpoint(base: &Url, path: &str) -> Result<Url, LlmProviderError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|err| LlmProviderError::configuration(format!("invalid endpoint {path}: {err}")))
}

/// Send `body` as JSON and decode a successful JSON response.
pub(super) async fn send_json<B, R>(request: RequestBuilder, body: &B) -> Result<R, LlmProviderError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .json(body)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    let bytes = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, bytes.as_ref()));
    }
    serde_json::from_slice(bytes.as_ref())
        .map_err(|err| LlmProviderError::decode(format!("invalid JSON payload: {err}")))
}

pub(super) fn map_transport_error(error: reqwest::Error) -> LlmProviderError {
    if error.is_timeout() {
        LlmProviderError::timeout(error.to_string())
    } else {
        LlmProviderError::transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> LlmProviderError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            LlmProviderError::timeout(format!("status {}", status.as_u16()))
        }
        _ => LlmProviderError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
