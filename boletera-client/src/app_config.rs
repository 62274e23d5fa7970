use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
}

/// Backend connectivity. No timeout knob: the transport default applies,
/// matching the observed behavior of the console this replaces.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // E.g. `BOLETERA_BACKEND__BASE_URL=https://api.example.cl`
            .add_source(config::Environment::with_prefix("BOLETERA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
