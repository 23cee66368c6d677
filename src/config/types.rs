use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;
use super::defaults::{
    clamp_max_response_bytes, default_acquisition_cost, default_base_url,
    default_connect_timeout_secs, default_max_response_bytes, default_number_of_customers,
    default_read_timeout_secs, default_retention_rate, default_revenue_per_user,
    default_write_timeout_secs,
};

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `service`, `calculator`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub calculator: CalculatorDefaults,
}

impl AppSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.service.base_url = self.service.base_url.trim().to_string();
        self.service.max_response_bytes = clamp_max_response_bytes(self.service.max_response_bytes);
        self
    }
}

/// Where the prediction service lives and how long to wait on it.
///
/// Config keys: `base_url`, `connect_timeout_secs`, `read_timeout_secs`,
/// `write_timeout_secs`, `max_response_bytes`. A timeout of `0` disables that
/// timeout entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
    /// Upper bound on a prediction response body.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl ServiceSettings {
    /// Parse and validate `base_url`.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.base_url)
    }
}

/// Validate a prediction service base URL.
///
/// Only absolute `http`/`https` URLs are accepted. A missing trailing slash is
/// added so endpoint names join as path segments instead of replacing the last
/// one.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Seed values for the calculator inputs.
///
/// Config keys: `acquisition_cost`, `revenue_per_user`, `retention_rate`,
/// `number_of_customers`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDefaults {
    #[serde(default = "default_acquisition_cost")]
    pub acquisition_cost: f64,
    #[serde(default = "default_revenue_per_user")]
    pub revenue_per_user: f64,
    #[serde(default = "default_retention_rate")]
    pub retention_rate: f64,
    #[serde(default = "default_number_of_customers")]
    pub number_of_customers: f64,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            acquisition_cost: default_acquisition_cost(),
            revenue_per_user: default_revenue_per_user(),
            retention_rate: default_retention_rate(),
            number_of_customers: default_number_of_customers(),
        }
    }
}
