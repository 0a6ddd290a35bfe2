use actix_web::{web, App};
use serde_json::{json, Value};

use quote_desk::{
    config::{AppConfig, PricingConfig},
    db::mongo::Store,
    middleware::auth::generate_token,
    models::user::StaffRole,
    routes,
};

pub const TEST_SECRET: &str = "test_secret";

pub struct TestApp {
    pub config: web::Data<AppConfig>,
    pub store: web::Data<Store>,
}

impl TestApp {
    /// The client connects lazily, so routes that never touch the database
    /// work without a running MongoDB.
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("valid MongoDB URI");

        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mongo_uri,
            database: "QuoteDeskTest".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            cors_origin: None,
            pricing: PricingConfig::default(),
        };

        Self {
            store: web::Data::new(Store::new(std::sync::Arc::new(client), "QuoteDeskTest")),
            config: web::Data::new(config),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.config.clone())
            .app_data(self.store.clone())
            .configure(routes::configure)
    }
}

pub fn bearer(role: StaffRole) -> (String, String) {
    let token = generate_token(TEST_SECRET, "agent@example.com", "000000000000000000000001", role)
        .expect("token");
    ("Authorization".to_string(), format!("Bearer {}", token))
}

/// Two adults and a child with bed, three nights, double and triple rooms.
pub fn family_draft() -> Value {
    json!({
        "client_name": "Rahman Family",
        "stay": { "check_in": "2025-03-12", "check_out": "2025-03-15" },
        "pax": { "adults": 2, "cwb": 1, "cnb": 0, "infants": 1 },
        "occupancy": { "mode": "rooms", "double": true, "triple": true },
        "hotel": { "name": "Creek Hotel", "rate": 500, "extra_bed_rate": 150 },
        "tours": [
            { "name": "Desert Safari", "cost_per_person": 150, "type": "group" }
        ],
        "add_ons": { "include_visa": true, "include_airport_transfer": true },
        "inclusions": ["Daily breakfast"]
    })
}
