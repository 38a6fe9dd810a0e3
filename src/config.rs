use std::{
    env,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::utils;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logs go to stdout instead of the error log file.
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub pool_size: u32,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: None,
            log_path: None,
            pool_size: DEFAULT_POOL_SIZE,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the data directory, then applies
    /// `VENUE_BOOK_*` environment overrides.
    pub fn load() -> Self {
        Self::load_from(&utils::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = match read_config(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring unreadable config {:?}: {err}", path);
                AppConfig::default()
            }
        };
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        override_from_env("VENUE_BOOK_DEBUG", &mut self.debug);
        override_from_env("VENUE_BOOK_HOST", &mut self.host);
        override_from_env("VENUE_BOOK_PORT", &mut self.port);
        override_from_env("VENUE_BOOK_SEED", &mut self.seed_demo_data);
        if let Ok(path) = env::var("VENUE_BOOK_DATABASE") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("VENUE_BOOK_LOG") {
            self.log_path = Some(PathBuf::from(path));
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(utils::database_path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(utils::log_path)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn override_from_env<T>(key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            info!("{key} set from environment");
            *slot = value;
        }
        Err(err) => warn!("Invalid {key} value {raw:?}: {err}"),
    }
}

fn read_config(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}
