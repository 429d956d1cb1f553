mod basic;
mod gbif;
mod schedule;

pub use basic::BasicConfig;
pub use gbif::{GBIF_MAX_OFFSET, GBIF_PAGE_LIMIT, GbifConfig};
pub use schedule::ScheduleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// GBIF occurrence search (see `gbif` table in config.toml).
    #[serde(default)]
    pub gbif: GbifConfig,

    /// Daily job trigger (see `schedule` table in config.toml).
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Flat environment variables and the config paths they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GBIF_API_URL", "gbif.api_url"),
    ("GBIF_USERNAME", "gbif.username"),
    ("GBIF_PASSWORD", "gbif.password"),
    ("DATASET_KEY", "gbif.dataset_key"),
    ("DATABASE_URL", "basic.database_url"),
    ("LOGLEVEL", "basic.loglevel"),
];

fn env_key_to_path(key: &UncasedStr) -> Uncased<'_> {
    ENV_OVERRIDES
        .iter()
        .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
        .map_or_else(|| key.into(), |(_, path)| (*path).into())
}

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// the well-known environment variables (highest precedence).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        let env_keys: Vec<&str> = ENV_OVERRIDES.iter().map(|(env, _)| *env).collect();
        figment.merge(Env::raw().only(&env_keys).map(env_key_to_path))
    }

    /// Loads configuration from defaults, `config.toml` and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Like [`Config::load`], but panics on malformed configuration.
    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + config.toml + env): {err}")
        })
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_env);
