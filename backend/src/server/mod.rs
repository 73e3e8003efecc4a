//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use inventory::Trace;
#[cfg(debug_assertions)]
use inventory::doc::ApiDoc;
use inventory::inbound::http::auth::{login, refresh, register};
use inventory::inbound::http::chat::chat_inventory;
use inventory::inbound::http::documents::upload_document;
use inventory::inbound::http::health::{HealthState, live, ready};
use inventory::inbound::http::products::{
    create_product, delete_product, get_product, list_products, low_stock_report, summary_report,
    update_product,
};
use inventory::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let auth = web::scope("/auth")
        .service(register)
        .service(login)
        .service(refresh);

    // Report routes are registered ahead of `/{id}`.
    let products = web::scope("/api/products")
        .service(low_stock_report)
        .service(summary_report)
        .service(list_products)
        .service(get_product)
        .service(create_product)
        .service(update_product)
        .service(delete_product);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(auth)
        .service(products)
        .service(web::scope("/chat").service(chat_inventory))
        .service(web::scope("/documents").service(upload_document))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when building adapters, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
