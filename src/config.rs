use serde::{Deserialize, Serialize};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

/// AED per USD used by the quote calculator.
pub const QUOTE_AED_PER_USD: f64 = 3.67;
/// AED per USD used by the older booking-side screens. Legacy quotes that
/// were stored without a rate were converted with this one.
pub const LEGACY_AED_PER_USD: f64 = 3.65;

/// Airport transfer price bands on total pax: (min, max, AED).
pub const TRANSFER_TIERS: [(u32, u32, f64); 3] = [(1, 5, 250.0), (6, 10, 500.0), (11, 17, 1000.0)];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    pub aed_per_usd: f64,
    pub visa_adult_aed: f64,
    pub visa_child_aed: f64,
    pub visa_infant_usd: f64,
    pub transfer_tiers: Vec<(u32, u32, f64)>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            aed_per_usd: QUOTE_AED_PER_USD,
            visa_adult_aed: 310.0,
            visa_child_aed: 73.0,
            visa_infant_usd: 20.0,
            transfer_tiers: TRANSFER_TIERS.to_vec(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Rates that would make USD figures infinite or negative fall back to the
/// quote rate.
fn usable_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        log::warn!(
            "Ignoring QUOTE_AED_PER_USD={}, using {}",
            rate,
            QUOTE_AED_PER_USD
        );
        QUOTE_AED_PER_USD
    }
}

impl PricingConfig {
    /// Create pricing constants from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            aed_per_usd: usable_rate(env_or("QUOTE_AED_PER_USD", defaults.aed_per_usd)),
            visa_adult_aed: env_or("VISA_ADULT_AED", defaults.visa_adult_aed),
            visa_child_aed: env_or("VISA_CHILD_AED", defaults.visa_child_aed),
            visa_infant_usd: env_or("VISA_INFANT_USD", defaults.visa_infant_usd),
            transfer_tiers: defaults.transfer_tiers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub cors_origin: Option<String>,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let mongo_uri =
            std::env::var("MONGODB_URI").map_err(|_| "MONGODB_URI must be set".to_string())?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: env_or("PORT", PORT),
            mongo_uri,
            database: std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "QuoteDesk".to_string()),
            jwt_secret,
            cors_origin: std::env::var("CORS_ORIGIN").ok(),
            pricing: PricingConfig::from_env(),
        })
    }
}
