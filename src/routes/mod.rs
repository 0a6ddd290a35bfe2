use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::repository::StoreError;
use crate::middleware::auth::AuthMiddleware;
use crate::models::{
    catalog::{BankAccount, Hotel, Inclusion, ItineraryItem, Tour},
    user::StaffRole,
};
use crate::services::occupancy_service::QuoteError;

pub mod account;
pub mod catalog;
pub mod health;
pub mod quote;

pub fn store_error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::InvalidId(_) | StoreError::Invalid(_) => {
            HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
        StoreError::NotFound(_) => HttpResponse::NotFound().json(json!({ "error": err.to_string() })),
        StoreError::Database(db_err) => {
            log::error!("Database operation failed: {:?}", db_err);
            HttpResponse::InternalServerError().json(json!({ "error": "Database operation failed" }))
        }
    }
}

pub fn quote_error_response(err: &QuoteError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
}

/// Every route of the service. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(account::signup))
                        .route("/signin", web::post().to(account::signin))
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware)
                                .route("/session", web::get().to(account::user_session)),
                        ),
                )
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware)
                        .service(
                            web::scope("/quotes")
                                .route("/calculate", web::post().to(quote::calculate))
                                .route("/legacy", web::post().to(quote::parse_legacy))
                                .route("", web::get().to(quote::list))
                                .route("", web::post().to(quote::create))
                                .route("/{id}", web::get().to(quote::get_by_id))
                                .route("/{id}", web::put().to(quote::update))
                                .route("/{id}", web::delete().to(quote::delete))
                                .route("/{id}/status", web::patch().to(quote::update_status)),
                        )
                        .service(catalog::scope::<Hotel>("/hotels", StaffRole::Admin))
                        .service(catalog::scope::<Tour>("/tours", StaffRole::Admin))
                        .service(catalog::scope::<Inclusion>("/inclusions", StaffRole::Admin))
                        .service(catalog::scope::<BankAccount>(
                            "/bank-accounts",
                            StaffRole::Admin,
                        ))
                        .service(catalog::scope::<ItineraryItem>(
                            "/itinerary-items",
                            StaffRole::Agent,
                        )),
                ),
        );
}
