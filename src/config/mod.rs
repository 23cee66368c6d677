//! Persisted settings: prediction service location and calculator seeds.

mod defaults;
mod errors;
mod io;
mod types;

pub use errors::ConfigError;
pub use io::{
    CONFIG_FILE_NAME, SERVICE_URL_ENV, config_path, load_or_default, load_settings_from, save,
    save_to_path,
};
pub use types::{AppSettings, CalculatorDefaults, ServiceSettings, parse_base_url};
