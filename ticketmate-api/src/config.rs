use serde::Deserialize;
use std::env;
use ticketmate_booking::prediction::PredictionWeights;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub prediction: PredictionWeights,
    #[serde(default = "default_seed")]
    pub seed_demo_trips: bool,
}

fn default_seed() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("TICKETMATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
