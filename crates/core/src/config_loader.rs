use crate::config::SimConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

/// Default config file name, looked up relative to the working directory.
const CONFIG_FILE: &str = "jq-trade.toml";

/// Environment variable prefix, e.g. `JQ_TRADE_INITIAL_CASH`.
const ENV_PREFIX: &str = "JQ_TRADE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads simulation configuration by layering environment variables
    /// over `jq-trade.toml` over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed or a
    /// value fails to deserialize.
    pub fn load() -> Result<SimConfig> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads simulation configuration from a specific TOML file path,
    /// still honoring environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed or a
    /// value fails to deserialize.
    pub fn load_from(path: &str) -> Result<SimConfig> {
        let config: SimConfig = Figment::from(Serialized::defaults(SimConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        Ok(config)
    }
}
