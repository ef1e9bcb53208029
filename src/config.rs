use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::calendar::WeekStart;
use crate::error::{Error, Result};

const CONFIG_PATH_ENV_VAR: &str = "HOLIPICK_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("holipick").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".holipick.toml"));
    }

    locations
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub holidays: Option<PathBuf>,
    pub week_start: WeekStart,
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    /// Reads a config file. A relative `holidays` path is taken relative to
    /// the directory of the config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config: Config = fs::read_to_string(path)?.parse()?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.holidays = config
            .holidays
            .map(|holidays| if holidays.is_relative() { base.join(holidays) } else { holidays });

        Ok(config)
    }
}

/// Loads `path` if given. Otherwise the first existing file of
/// [`find_configfile_locations`] is used, falling back to the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(found) => {
            log::info!("Using config file {}", found.display());
            Config::load_from_file(&found)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
