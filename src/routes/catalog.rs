use actix_web::{web, HttpResponse, Responder, Scope};

use crate::db::{
    mongo::Store,
    repository::{self, ListParams, Record},
};
use crate::middleware::role_auth::RequireRole;
use crate::models::user::StaffRole;
use crate::routes::store_error_response;

/*
    GET /api/<records>
*/
pub async fn list<T: Record>(
    store: web::Data<Store>,
    params: web::Query<ListParams>,
) -> impl Responder {
    match repository::list::<T>(&store, &params).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => store_error_response(&err),
    }
}

/*
    GET /api/<records>/{id}
*/
pub async fn get_by_id<T: Record>(store: web::Data<Store>, path: web::Path<String>) -> impl Responder {
    match repository::get::<T>(&store, &path.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => store_error_response(&err),
    }
}

pub async fn create<T: Record>(store: web::Data<Store>, input: web::Json<T>) -> impl Responder {
    match repository::create(&store, input.into_inner()).await {
        Ok(record) => {
            log::info!("Created {} {:?}", T::LABEL, record.id());
            HttpResponse::Created().json(record)
        }
        Err(err) => store_error_response(&err),
    }
}

pub async fn update<T: Record>(
    store: web::Data<Store>,
    path: web::Path<String>,
    input: web::Json<T>,
) -> impl Responder {
    match repository::update(&store, &path.into_inner(), input.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => store_error_response(&err),
    }
}

pub async fn delete<T: Record>(store: web::Data<Store>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match repository::delete::<T>(&store, &id).await {
        Ok(()) => {
            log::info!("Deleted {} {}", T::LABEL, id);
            HttpResponse::NoContent().finish()
        }
        Err(err) => store_error_response(&err),
    }
}

/// CRUD routes for one record type. Any signed-in staff member can read;
/// writes need `write_role`.
pub fn scope<T: Record>(path: &str, write_role: StaffRole) -> Scope {
    web::scope(path)
        .route("", web::get().to(list::<T>))
        .route("/{id}", web::get().to(get_by_id::<T>))
        .service(
            web::scope("")
                .wrap(RequireRole::new(write_role))
                .route("", web::post().to(create::<T>))
                .route("/{id}", web::put().to(update::<T>))
                .route("/{id}", web::delete().to(delete::<T>)),
        )
}
