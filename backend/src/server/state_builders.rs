//! Builders wiring domain services to their outbound adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use inventory::domain::{
    AuthService, ChatModels, ChatService, DocumentService, ProductService,
};
use inventory::inbound::http::state::HttpState;
use inventory::outbound::llm::{OllamaChatModel, OpenAiClient};
use inventory::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselLlmCacheRepository, DieselProductRepository,
    DieselUserRepository, DieselVectorStore,
};
use inventory::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use inventory::settings::AppSettings;

use super::ServerConfig;

/// Build handler state from the configuration.
///
/// Uses the database-backed services when a pool is configured, otherwise
/// the in-memory fixtures.
///
/// # Errors
/// Returns [`std::io::Error`] when a model provider client cannot be built
/// from the configured settings.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match &config.db_pool {
        Some(pool) => build_persistent_state(pool, &config.settings),
        None => Ok(HttpState::fixtures()),
    }
}

fn io_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

fn build_persistent_state(pool: &DbPool, settings: &AppSettings) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let tokens = JwtTokenService::new(&settings.jwt_config(), clock.clone());
    let auth = AuthService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(tokens),
    );

    let products = Arc::new(ProductService::new(Arc::new(DieselProductRepository::new(
        pool.clone(),
    ))));

    let openai_settings = settings
        .openai_settings()
        .map_err(|err| io_error("openai settings", err))?;
    let openai =
        Arc::new(OpenAiClient::new(openai_settings).map_err(|err| io_error("openai client", err))?);
    let ollama_settings = settings
        .ollama_settings()
        .map_err(|err| io_error("ollama settings", err))?;
    let ollama = Arc::new(
        OllamaChatModel::new(ollama_settings).map_err(|err| io_error("ollama client", err))?,
    );

    let vectors = Arc::new(DieselVectorStore::new(pool.clone()));
    let cache = Arc::new(DieselLlmCacheRepository::new(pool.clone()));
    let chat = ChatService::new(
        openai.clone(),
        vectors.clone(),
        cache.clone(),
        ChatModels {
            openai: openai.clone(),
            ollama,
        },
        clock,
    )
    .with_cache_ttl(settings.cache_ttl());
    let documents = DocumentService::new(
        Arc::new(DieselDocumentRepository::new(pool.clone())),
        openai,
        vectors,
        cache,
    );

    Ok(HttpState {
        auth: Arc::new(auth),
        products: products.clone(),
        products_query: products,
        chat: Arc::new(chat),
        documents: Arc::new(documents),
    })
}
