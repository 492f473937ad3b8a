use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Settings shared by every HTTP service: where to listen.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load from an optional `configuration.*` file, then the process
    /// environment (`PORT`). A `.env` file is read first when present.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}
