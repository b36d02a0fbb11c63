pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::invoice_service::InvoiceService;
use config::Config;
use domain::ports::ChainWriteClient;
use infrastructure::chain_client::HttpChainClient;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoice::get_invoice,
        handlers::invoice::set_field,
        handlers::invoice::set_item_field,
        handlers::invoice::add_item,
        handlers::invoice::remove_item,
        handlers::invoice::reset_invoice,
        handlers::invoice::submit_invoice,
        handlers::invoice::update_account,
        handlers::invoice::connect_wallet,
    ),
    tags(
        (name = "invoice", description = "Invoice draft and submission"),
        (name = "account", description = "Wallet connection"),
    )
)]
pub struct ApiDoc;

/// Build the form session from configuration. Without a relay URL the
/// session has no chain client and every submit fails its precondition.
pub fn build_service(config: &Config) -> InvoiceService {
    let client: Option<Arc<dyn ChainWriteClient>> = match &config.relay_url {
        Some(url) => Some(Arc::new(HttpChainClient::new(url))),
        None => {
            log::warn!("CHAIN_RELAY_URL not set; submissions will fail until a client is configured");
            None
        }
    };
    InvoiceService::new(config.controller_settings(), client)
}

/// Register the invoice and account routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoice")
            .route("", web::get().to(handlers::invoice::get_invoice))
            .route("", web::delete().to(handlers::invoice::reset_invoice))
            .route("/fields/{field}", web::put().to(handlers::invoice::set_field))
            .route("/items", web::post().to(handlers::invoice::add_item))
            .route("/items/{index}", web::delete().to(handlers::invoice::remove_item))
            .route(
                "/items/{index}/{field}",
                web::put().to(handlers::invoice::set_item_field),
            )
            .route("/submit", web::post().to(handlers::invoice::submit_invoice)),
    )
    .service(
        web::scope("/account")
            .route("", web::put().to(handlers::invoice::update_account))
            .route("/connect", web::post().to(handlers::invoice::connect_wallet)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: web::Data<InvoiceService>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
