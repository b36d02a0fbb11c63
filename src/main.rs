use actix_web::web;
use dotenvy::dotenv;
use invoice_form::config::Config;
use invoice_form::{build_server, build_service};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let service = web::Data::new(build_service(&config));

    log::info!(
        "Starting server at http://{}:{} (contract {})",
        config.host,
        config.port,
        config.contract_address
    );

    build_server(service, &config.host, config.port)?.await
}
