//! Layered configuration for covid-compare.
//!
//! Values are resolved in the following order, later sources winning:
//! 1. Built-in defaults
//! 2. Config file (TOML)
//! 3. Environment variables (`COVID_COMPARE_*`, `__` separates section and field)
//! 4. CLI arguments, merged on top by the binary

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::{
    Result,
    error::{CompareError, CompareErrorKind},
};

pub const ENV_PREFIX: &str = "COVID_COMPARE_";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "covid-compare";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub verbose: bool,
}

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub world: PathBuf,
    pub states: PathBuf,
    pub counties: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            world: PathBuf::from("owid-covid-latest.csv"),
            states: PathBuf::from("us-states.csv"),
            counties: PathBuf::from("us-counties.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: 800,
            height: 600,
        }
    }
}

/// Every config section, used to seed the figment with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub global: GlobalConfig,
    pub datasets: DatasetPaths,
    pub charts: ChartConfig,
}

impl GlobalConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.extract_inner("global")?)
    }
}

impl DatasetPaths {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.extract_inner("datasets")?)
    }
}

impl ChartConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.extract_inner("charts")?)
    }
}

/// Values given on the command line. `None`/`false` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub verbose: bool,
    pub world: Option<PathBuf>,
    pub states: Option<PathBuf>,
    pub counties: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CliOverrides {
    /// Merge the given values on top of `figment`
    pub fn apply(&self, mut figment: Figment) -> Figment {
        if self.verbose {
            figment = figment.merge(Serialized::default("global.verbose", true));
        }

        let paths = [
            ("datasets.world", &self.world),
            ("datasets.states", &self.states),
            ("datasets.counties", &self.counties),
            ("charts.output_dir", &self.output_dir),
        ];
        for (key, value) in paths {
            if let Some(path) = value {
                figment = figment.merge(Serialized::default(key, path));
            }
        }

        if let Some(width) = self.width {
            figment = figment.merge(Serialized::default("charts.width", width));
        }
        if let Some(height) = self.height {
            figment = figment.merge(Serialized::default("charts.height", height));
        }

        figment
    }
}

/// The per-user config file, e.g. `~/.config/covid-compare/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Build a figment from defaults, the given config file and the environment.
///
/// Unlike the implicit per-user file, an explicitly given file must exist.
pub fn create_figment_from_file(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        return Err(CompareError::from(CompareErrorKind::ConfigFileNotFound {
            path: path.to_path_buf(),
        })
        .with_hint(Some("Check the --config argument")));
    }

    tracing::debug!("Loading config file: {}", path.display());
    Ok(layered(Some(path)))
}

/// Build a figment from an explicit config file, or the per-user one if present.
pub fn create_figment(explicit_path: Option<&Path>) -> Result<Figment> {
    if let Some(path) = explicit_path {
        return create_figment_from_file(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!("Using config file: {}", path.display());
            Ok(layered(Some(&path)))
        }
        _ => {
            tracing::debug!("No config file found, using defaults and environment");
            Ok(layered(None))
        }
    }
}

fn layered(config_file: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}
