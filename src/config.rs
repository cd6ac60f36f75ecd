//! Configuration management for flight-delays.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::selection::{parse_month, CarrierFilter, DayOfMonth, Selection, ALL_CARRIERS_LABEL};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "flight-delays.toml";

/// Directory under the platform config dir.
const CONFIG_DIR_NAME: &str = "flight-delays";

/// Environment variable prefix; nested keys are separated by `__`.
const ENV_PREFIX: &str = "FLIGHT_DELAYS_";

/// Application configuration.
///
/// Precedence, highest first:
/// 1. Environment variables (`FLIGHT_DELAYS_DATA__PATH=...`)
/// 2. TOML config file
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset source.
    pub data: DataConfig,
    /// Query tuning.
    pub query: QueryConfig,
    /// Selection used when the command line leaves a field out.
    pub selection: SelectionConfig,
}

/// Dataset source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV or Parquet file holding the delay-cause table.
    pub path: PathBuf,
    /// Rows per decoded batch.
    pub batch_size: usize,
    /// Cell values read as missing.
    pub null_values: Vec<String>,
}

/// Query configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of destinations in the top-destinations result.
    pub top_destinations: usize,
}

/// Default selection, as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Month name or number.
    pub month: String,
    /// Day of month.
    pub day: u32,
    /// Carrier code, or "All Carriers".
    pub carrier: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("airlinedelaycauses_DelayedFlights.csv"),
            batch_size: 8192,
            null_values: vec![
                "NA".to_string(),
                "null".to_string(),
                String::new(),
                "NULL".to_string(),
            ],
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_destinations: 10,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            month: "January".to_string(),
            day: 1,
            carrier: ALL_CARRIERS_LABEL.to_string(),
        }
    }
}

impl DataConfig {
    /// Regex matching any configured null marker, for the CSV decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined pattern fails to compile.
    pub fn null_regex(&self) -> Result<Regex> {
        let alternatives: Vec<String> = self.null_values.iter().map(|v| regex::escape(v)).collect();
        Regex::new(&format!("^(?:{})$", alternatives.join("|"))).map_err(|e| {
            Error::ConfigValidation {
                message: format!("invalid null_values: {e}"),
            }
        })
    }
}

impl SelectionConfig {
    /// Parse into a validated selection.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown month, out-of-range day or empty carrier.
    pub fn to_selection(&self) -> Result<Selection> {
        Ok(Selection::new(
            parse_month(&self.month)?,
            DayOfMonth::new(self.day)?,
            self.carrier.parse::<CarrierFilter>()?,
        ))
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.data.batch_size == 0 {
            return Err(Error::ConfigValidation {
                message: "data.batch_size must be greater than 0".to_string(),
            });
        }

        if self.query.top_destinations == 0 {
            return Err(Error::ConfigValidation {
                message: "query.top_destinations must be greater than 0".to_string(),
            });
        }

        self.data.null_regex()?;

        self.selection
            .to_selection()
            .map_err(|e| Error::ConfigValidation {
                message: format!("selection: {e}"),
            })?;

        Ok(())
    }
}
