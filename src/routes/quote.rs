use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::{
    mongo::Store,
    repository::{self, ListParams, StoreError},
};
use crate::middleware::auth_context::StaffMember;
use crate::models::{
    catalog::BankAccount,
    quote::{QuoteRequest, SavedQuote, StatusUpdate},
};
use crate::routes::{quote_error_response, store_error_response};
use crate::services::{legacy_notes, quote_service};

#[derive(Debug, Deserialize)]
pub struct LegacyNotesInput {
    pub notes: String,
}

async fn find_bank_account(store: &Store, id: Option<&str>) -> Result<Option<BankAccount>, StoreError> {
    match id {
        Some(id) => repository::get::<BankAccount>(store, id).await.map(Some),
        None => Ok(None),
    }
}

/*
    POST /api/quotes/calculate
    Prices the draft and renders both documents without saving anything.
*/
pub async fn calculate(
    config: web::Data<AppConfig>,
    store: web::Data<Store>,
    input: web::Json<QuoteRequest>,
) -> impl Responder {
    let request = input.into_inner();

    let bank_account = match find_bank_account(&store, request.bank_account_id.as_deref()).await {
        Ok(account) => account,
        Err(err) => return store_error_response(&err),
    };

    match quote_service::build_documents(
        &request.draft,
        &config.pricing,
        request.reference.as_deref().unwrap_or_default(),
        bank_account.as_ref(),
    ) {
        Ok(documents) => HttpResponse::Ok().json(documents),
        Err(err) => {
            log::debug!("Quote rejected: {}", err);
            quote_error_response(&err)
        }
    }
}

pub async fn create(
    config: web::Data<AppConfig>,
    store: web::Data<Store>,
    staff: StaffMember,
    input: web::Json<QuoteRequest>,
) -> impl Responder {
    let request = input.into_inner();

    let bank_account = match find_bank_account(&store, request.bank_account_id.as_deref()).await {
        Ok(account) => account,
        Err(err) => return store_error_response(&err),
    };

    let quote = match quote_service::new_saved_quote(
        request.draft,
        &config.pricing,
        Some(staff.email.clone()),
        bank_account.as_ref(),
    ) {
        Ok(quote) => quote,
        Err(err) => return quote_error_response(&err),
    };

    match repository::create(&store, quote).await {
        Ok(saved) => {
            log::info!("Quote {} saved by {}", saved.reference, staff.audit_name());
            HttpResponse::Created().json(saved)
        }
        Err(err) => store_error_response(&err),
    }
}

/*
    GET /api/quotes?status=sent
*/
pub async fn list(store: web::Data<Store>, params: web::Query<ListParams>) -> impl Responder {
    match repository::list::<SavedQuote>(&store, &params).await {
        Ok(quotes) => HttpResponse::Ok().json(quotes),
        Err(err) => store_error_response(&err),
    }
}

pub async fn get_by_id(store: web::Data<Store>, path: web::Path<String>) -> impl Responder {
    match repository::get::<SavedQuote>(&store, &path.into_inner()).await {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(err) => store_error_response(&err),
    }
}

/*
    PUT /api/quotes/{id}
    Takes a whole new draft; the stored documents are re-rendered from it.
*/
pub async fn update(
    config: web::Data<AppConfig>,
    store: web::Data<Store>,
    staff: StaffMember,
    path: web::Path<String>,
    input: web::Json<QuoteRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let request = input.into_inner();

    let mut quote = match repository::get::<SavedQuote>(&store, &id).await {
        Ok(quote) => quote,
        Err(err) => return store_error_response(&err),
    };

    let bank_account = match find_bank_account(&store, request.bank_account_id.as_deref()).await {
        Ok(account) => account,
        Err(err) => return store_error_response(&err),
    };

    if let Err(err) =
        quote_service::revise_quote(&mut quote, request.draft, &config.pricing, bank_account.as_ref())
    {
        return quote_error_response(&err);
    }

    match repository::replace(&store, &quote).await {
        Ok(()) => {
            log::info!("Quote {} revised by {}", quote.reference, staff.audit_name());
            HttpResponse::Ok().json(quote)
        }
        Err(err) => store_error_response(&err),
    }
}

pub async fn update_status(
    store: web::Data<Store>,
    staff: StaffMember,
    path: web::Path<String>,
    input: web::Json<StatusUpdate>,
) -> impl Responder {
    let mut quote = match repository::get::<SavedQuote>(&store, &path.into_inner()).await {
        Ok(quote) => quote,
        Err(err) => return store_error_response(&err),
    };

    quote.status = input.status;
    quote.updated_at = Some(Utc::now());

    match repository::replace(&store, &quote).await {
        Ok(()) => {
            log::info!(
                "Quote {} marked {} by {}",
                quote.reference,
                quote.status.as_str(),
                staff.audit_name()
            );
            HttpResponse::Ok().json(quote)
        }
        Err(err) => store_error_response(&err),
    }
}

pub async fn delete(
    store: web::Data<Store>,
    staff: StaffMember,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match repository::delete::<SavedQuote>(&store, &id).await {
        Ok(()) => {
            log::info!("Quote {} deleted by {}", id, staff.audit_name());
            HttpResponse::NoContent().finish()
        }
        Err(err) => store_error_response(&err),
    }
}

/*
    POST /api/quotes/legacy
    Recovers hotels, tours and pax from an old notes field.
*/
pub async fn parse_legacy(input: web::Json<LegacyNotesInput>) -> impl Responder {
    HttpResponse::Ok().json(legacy_notes::parse_notes(&input.notes))
}
