use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every guardian binary. Service-specific configuration
/// flattens this in and layers its own env handling on top.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from an optional `guardian` file, then `GUARDIAN__`-prefixed
    /// environment variables (e.g. `GUARDIAN__PORT`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("guardian").required(false))
            .add_source(config::Environment::with_prefix("GUARDIAN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
