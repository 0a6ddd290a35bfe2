use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::db::{mongo::Store, repository::parse_id};
use crate::middleware::auth::{generate_token, Claims};
use crate::models::user::{Credentials, StaffRole, StaffUser, UserSession};

const USERS: &str = "Staff";
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    auth_token: String,
}

fn token_response(config: &AppConfig, email: &str, user_id: &str, role: StaffRole) -> HttpResponse {
    match generate_token(&config.jwt_secret, email, user_id, role) {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
        Err(err) => {
            log::error!("Token generation failed: {:?}", err);
            HttpResponse::InternalServerError().body("Token generation failed")
        }
    }
}

pub async fn signup(
    config: web::Data<AppConfig>,
    store: web::Data<Store>,
    input: web::Json<Credentials>,
) -> impl Responder {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();

    if email.is_empty() || !email.contains('@') {
        return HttpResponse::BadRequest().json(json!({ "error": "A valid email is required" }));
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH)
        }));
    }

    let collection = store.collection::<StaffUser>(USERS);

    match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(_)) => return HttpResponse::Conflict().body("Account already exists"),
        Ok(None) => {}
        Err(err) => {
            log::error!("Failed to look up user: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account.");
        }
    }

    let password = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Password hashing failed: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account.");
        }
    };

    let now = Utc::now();
    let user = StaffUser {
        id: None,
        email: email.clone(),
        password,
        first_name: input.first_name,
        last_name: input.last_name,
        role: StaffRole::Agent,
        last_signin: None,
        failed_signins: Some(0),
        created_at: Some(now),
        updated_at: Some(now),
    };

    match collection.insert_one(&user).await {
        Ok(result) => match result.inserted_id.as_object_id() {
            Some(user_id) => token_response(&config, &email, &user_id.to_hex(), user.role),
            None => HttpResponse::InternalServerError().body("Failed to create account."),
        },
        Err(err) => {
            log::error!("Failed to insert user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create account.")
        }
    }
}

pub async fn signin(
    config: web::Data<AppConfig>,
    store: web::Data<Store>,
    input: web::Json<Credentials>,
) -> impl Responder {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();
    let collection = store.collection::<StaffUser>(USERS);

    let user = match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(user)) => user,
        Ok(None) => return HttpResponse::Unauthorized().body("Invalid credentials"),
        Err(err) => {
            log::error!("Database error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to process signin");
        }
    };

    if !bcrypt::verify(&input.password, &user.password).unwrap_or(false) {
        let failed_signins = user.failed_signins.unwrap_or(0) + 1;
        let update = doc! { "$set": { "failed_signins": failed_signins } };

        return match collection.update_one(doc! { "email": &email }, update).await {
            Ok(_) => HttpResponse::Unauthorized().body("Invalid credentials"),
            Err(err) => {
                log::error!("Failed to update failed signins: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process signin")
            }
        };
    }

    let update = doc! {
        "$set": {
            "last_signin": Utc::now().to_rfc3339(),
            "failed_signins": 0
        }
    };

    if let Err(err) = collection.update_one(doc! { "email": &email }, update).await {
        log::error!("Failed to record signin: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to sign in.");
    }

    match user.id {
        Some(user_id) => token_response(&config, &email, &user_id.to_hex(), user.role),
        None => HttpResponse::InternalServerError().body("Unable to read user id."),
    }
}

pub async fn user_session(claims: web::ReqData<Claims>, store: web::Data<Store>) -> impl Responder {
    let user_id = match parse_id(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let collection = store.collection::<StaffUser>(USERS);
    match collection.find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserSession {
            id: user.id.unwrap_or(user_id),
            email: user.email,
            first_name: user.first_name.unwrap_or_default(),
            last_name: user.last_name.unwrap_or_default(),
            role: user.role,
            created_at: user.created_at.unwrap_or_default(),
        }),
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            log::error!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch user")
        }
    }
}
