use nusa_booking::BookingLimits;
use nusa_catalog::pricing::PricingConfig;
use nusa_catalog::ProductSnapshot;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Without a database section bookings live in memory.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub catalog: CatalogSeed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

/// Payment gateway callback settings.
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentsConfig {
    /// Expected `x-webhook-secret` header value. Kept apart from `auth.jwt_secret`.
    pub webhook_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_child_ratio")]
    pub child_price_ratio_percent: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

fn default_child_ratio() -> u32 { 80 }
fn default_currency() -> String { "IDR".to_string() }
fn default_max_party_size() -> u32 { 50 }

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            child_price_ratio_percent: default_child_ratio(),
            currency: default_currency(),
            max_party_size: default_max_party_size(),
        }
    }
}

impl BookingRules {
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            child_price_ratio_percent: self.child_price_ratio_percent,
        }
    }

    pub fn limits(&self) -> BookingLimits {
        BookingLimits {
            max_party_size: self.max_party_size,
            currency: self.currency.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { channel_capacity: 256 }
    }
}

/// Products loaded into the catalog at startup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<ProductSnapshot>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. NUSA_SERVER__PORT=9000
            .add_source(config::Environment::with_prefix("NUSA").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
