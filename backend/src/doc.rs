//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the bearer token security
//! scheme. The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, InventorySummary, Product, ProductDraft, ProductPatch};
use crate::domain::{Role, TokenPair};
use crate::inbound::http::auth::{LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse};
use crate::inbound::http::chat::{ChatRequest, ChatResponse};
use crate::inbound::http::documents::{UploadRequest, UploadResponse};
use crate::inbound::http::products::MessageResponse;

/// Adds the `bearer` JWT security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Inventory API",
        description = "Product inventory with role-based access and a document-aware chatbot."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::low_stock_report,
        crate::inbound::http::products::summary_report,
        crate::inbound::http::chat::chat_inventory,
        crate::inbound::http::documents::upload_document,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Product,
        ProductDraft,
        ProductPatch,
        InventorySummary,
        Role,
        TokenPair,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        RefreshRequest,
        ChatRequest,
        ChatResponse,
        UploadRequest,
        UploadResponse,
        MessageResponse,
    )),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "products", description = "Inventory records"),
        (name = "reports", description = "Inventory reports"),
        (name = "chat", description = "Retrieval-augmented chatbot"),
        (name = "documents", description = "Chatbot context uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
