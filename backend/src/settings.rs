//! Service configuration loaded via OrthoConfig.
//!
//! Every field can be set with an `INVENTORY_*` environment variable or the
//! matching CLI flag; unset fields fall back to the defaults below.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::DEFAULT_CACHE_TTL_MINUTES;
use crate::outbound::llm::{OllamaSettings, OpenAiSettings};
use crate::outbound::persistence::PoolConfig;
use crate::outbound::security::JwtConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_CHAT_MODEL: &str = "llama3";
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 60;
const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;
const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 60;
const FALLBACK_JWT_SECRET: &str = "inventory-development-secret";

/// Errors raised while turning raw settings into adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid URL for {field}: {message}")]
    Url { field: &'static str, message: String },
}

/// Configuration values for the server and command-line tools.
#[derive(Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without it the server runs on fixtures.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// HMAC secret for signing tokens.
    pub jwt_secret: Option<String>,
    pub jwt_access_ttl_minutes: Option<i64>,
    pub jwt_refresh_ttl_days: Option<i64>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_chat_model: Option<String>,
    pub openai_embedding_model: Option<String>,
    pub ollama_base_url: Option<String>,
    pub ollama_chat_model: Option<String>,
    /// Upper bound for a single model request.
    pub llm_timeout_seconds: Option<u64>,
    /// How long chatbot answers stay cached.
    pub cache_ttl_minutes: Option<i64>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("ollama_base_url", &self.ollama_base_url)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

/// Build a duration from a positive configured amount. Missing or
/// non-positive amounts use `default`, as do amounts too large to represent.
fn positive_duration(
    field: &'static str,
    value: Option<i64>,
    build: fn(i64) -> Option<Duration>,
    default: Duration,
) -> Duration {
    match value.filter(|amount| *amount > 0) {
        None => default,
        Some(amount) => build(amount).unwrap_or_else(|| {
            warn!(field, amount, "configured duration is out of range; using the default");
            default
        }),
    }
}

fn parse_url(field: &'static str, value: Option<&String>, default: &str) -> Result<Url, SettingsError> {
    let raw = non_blank(value).unwrap_or(default);
    Url::parse(raw).map_err(|err| SettingsError::Url {
        field,
        message: err.to_string(),
    })
}

impl AppSettings {
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_ref())
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(PoolConfig::new)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Token signing configuration. Without a secret a fixed development
    /// secret is used and a warning is logged.
    pub fn jwt_config(&self) -> JwtConfig {
        let secret = match non_blank(self.jwt_secret.as_ref()) {
            Some(secret) => secret.to_owned(),
            None => {
                warn!("INVENTORY_JWT_SECRET is not set; using the development fallback secret");
                FALLBACK_JWT_SECRET.to_owned()
            }
        };
        JwtConfig {
            secret: Zeroizing::new(secret),
            access_ttl: positive_duration(
                "jwt_access_ttl_minutes",
                self.jwt_access_ttl_minutes,
                Duration::try_minutes,
                Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            ),
            refresh_ttl: positive_duration(
                "jwt_refresh_ttl_days",
                self.jwt_refresh_ttl_days,
                Duration::try_days,
                Duration::days(DEFAULT_REFRESH_TTL_DAYS),
            ),
        }
    }

    pub fn llm_timeout(&self) -> StdDuration {
        StdDuration::from_secs(
            self.llm_timeout_seconds
                .filter(|seconds| *seconds > 0)
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECONDS),
        )
    }

    pub fn cache_ttl(&self) -> Duration {
        positive_duration(
            "cache_ttl_minutes",
            self.cache_ttl_minutes,
            Duration::try_minutes,
            Duration::minutes(DEFAULT_CACHE_TTL_MINUTES),
        )
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the base URL is malformed.
    pub fn openai_settings(&self) -> Result<OpenAiSettings, SettingsError> {
        Ok(OpenAiSettings {
            base_url: parse_url(
                "openai_base_url",
                self.openai_base_url.as_ref(),
                DEFAULT_OPENAI_BASE_URL,
            )?,
            api_key: non_blank(self.openai_api_key.as_ref())
                .map(|key| Zeroizing::new(key.to_owned())),
            chat_model: non_blank(self.openai_chat_model.as_ref())
                .unwrap_or(DEFAULT_OPENAI_CHAT_MODEL)
                .to_owned(),
            embedding_model: non_blank(self.openai_embedding_model.as_ref())
                .unwrap_or(DEFAULT_OPENAI_EMBEDDING_MODEL)
                .to_owned(),
            timeout: self.llm_timeout(),
        })
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the base URL is malformed.
    pub fn ollama_settings(&self) -> Result<OllamaSettings, SettingsError> {
        Ok(OllamaSettings {
            base_url: parse_url(
                "ollama_base_url",
                self.ollama_base_url.as_ref(),
                DEFAULT_OLLAMA_BASE_URL,
            )?,
            chat_model: non_blank(self.ollama_chat_model.as_ref())
                .unwrap_or(DEFAULT_OLLAMA_CHAT_MODEL)
                .to_owned(),
            timeout: self.llm_timeout(),
        })
    }
}
