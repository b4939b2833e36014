use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub address_validation: AddressValidationConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Inventory persistence is enabled only when `url` is set.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationProvider {
    Local,
    Nominatim,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AddressValidationConfig {
    #[serde(default = "default_provider")]
    pub provider: ValidationProvider,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_postal_codes")]
    pub postal_codes: Vec<String>,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AddressValidationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            city: default_city(),
            postal_codes: default_postal_codes(),
            nominatim_url: default_nominatim_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_provider() -> ValidationProvider {
    ValidationProvider::Local
}
fn default_city() -> String {
    "Toulouse".into()
}
fn default_postal_codes() -> Vec<String> {
    vec!["31000".into()]
}
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".into()
}
fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    #[serde(default = "default_base_minutes")]
    pub base_minutes: u32,
    #[serde(default = "default_per_pizza_minutes")]
    pub per_pizza_minutes: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_minutes: default_base_minutes(),
            per_pizza_minutes: default_per_pizza_minutes(),
        }
    }
}

fn default_base_minutes() -> u32 {
    30
}
fn default_per_pizza_minutes() -> u32 {
    5
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // local, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. PIZZERIA__SERVER__PORT=9000
            .add_source(
                config::Environment::with_prefix("PIZZERIA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("address_validation.postal_codes")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse("[server]\nport = 8000\n");
        assert_eq!(config.server.port, 8000);
        assert!(config.database.url.is_none());
        assert_eq!(config.address_validation.provider, ValidationProvider::Local);
        assert_eq!(config.address_validation.city, "Toulouse");
        assert_eq!(config.address_validation.postal_codes, vec!["31000"]);
        assert_eq!(config.delivery.base_minutes, 30);
        assert_eq!(config.delivery.per_pizza_minutes, 5);
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [server]
            port = 9000

            [database]
            url = "postgres://localhost/pizzeria"

            [address_validation]
            provider = "nominatim"
            postal_codes = ["31000", "31100"]
            timeout_ms = 1500

            [delivery]
            base_minutes = 25
            "#,
        );
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/pizzeria"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.address_validation.provider, ValidationProvider::Nominatim);
        assert_eq!(config.address_validation.postal_codes.len(), 2);
        assert_eq!(config.address_validation.timeout_ms, 1500);
        assert_eq!(config.delivery.base_minutes, 25);
        assert_eq!(config.delivery.per_pizza_minutes, 5);
    }
}
