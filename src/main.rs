use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use quote_desk::{config::AppConfig, db, routes};

fn cors(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    match origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    log::info!(
        "Pricing at {} AED/USD, visa {}/{} AED",
        config.pricing.aed_per_usd,
        config.pricing.visa_adult_aed,
        config.pricing.visa_child_aed
    );

    let client = db::mongo::create_mongo_client(&config.mongo_uri)
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let store = db::mongo::Store::new(client, config.database.clone());

    let bind = (config.host.clone(), config.port);
    log::info!("Starting HTTP server on {}:{}", bind.0, bind.1);

    let config = web::Data::new(config);
    let store = web::Data::new(store);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(config.cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(config.clone())
            .app_data(store.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
