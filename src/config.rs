use thiserror::Error;

use crate::application::invoice_controller::ControllerSettings;

pub const DEFAULT_ARTIFACT_URL: &str = "https://example.com/invoice.pdf";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub contract_address: String,
    /// No chain client is built when unset.
    pub relay_url: Option<String>,
    pub artifact_url: String,
    pub guard_in_flight: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
            })?,
            None => 8080,
        };

        let guard_in_flight = match var("GUARD_IN_FLIGHT_SUBMISSIONS") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                name: "GUARD_IN_FLIGHT_SUBMISSIONS",
                value: raw.clone(),
            })?,
            None => false,
        };

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            contract_address: var("INVOICE_CONTRACT_ADDRESS")
                .ok_or(ConfigError::Missing("INVOICE_CONTRACT_ADDRESS"))?,
            relay_url: var("CHAIN_RELAY_URL"),
            artifact_url: var("INVOICE_ARTIFACT_URL")
                .unwrap_or_else(|| DEFAULT_ARTIFACT_URL.to_string()),
            guard_in_flight,
        })
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            contract_address: self.contract_address.clone(),
            artifact_url: self.artifact_url.clone(),
            guard_in_flight: self.guard_in_flight,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
