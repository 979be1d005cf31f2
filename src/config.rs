use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Env var naming an explicit JSON config file.
pub const CONFIG_ENV: &str = "BIKE_DASHBOARD_CONFIG";
/// Env var overriding the directory holding `day_data.csv` / `hour_data.csv`.
pub const DATA_DIR_ENV: &str = "BIKE_DASHBOARD_DATA_DIR";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "bike_dashboard.json";

pub const DAY_FILE: &str = "day_data.csv";
pub const HOUR_FILE: &str = "hour_data.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON configuration in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },
}

/// Where the dashboard finds its inputs, plus window geometry.
///
/// Every key is optional in the JSON file:
///
/// ```json
/// {
///   "day_path": "main-data/day_data.csv",
///   "hour_path": "main-data/hour_data.csv",
///   "logo_path": "assets/logo.png",
///   "window_size": [1280.0, 900.0]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub day_path: PathBuf,
    pub hour_path: PathBuf,
    pub logo_path: PathBuf,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let data_dir = Path::new("main-data");
        Self {
            day_path: data_dir.join(DAY_FILE),
            hour_path: data_dir.join(HOUR_FILE),
            logo_path: PathBuf::from("assets/logo.png"),
            window_size: [1280.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the environment.
    ///
    /// `BIKE_DASHBOARD_CONFIG` names the file to read; otherwise
    /// `bike_dashboard.json` is read when present.  A missing, unreadable or
    /// malformed file is logged and replaced by the defaults.  `BIKE_DASHBOARD_DATA_DIR`
    /// is applied last, whatever happened to the file.
    pub fn load() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve(explicit.as_deref(), data_dir.as_deref())
    }

    fn resolve(explicit: Option<&Path>, data_dir: Option<&Path>) -> Self {
        let default_file = Path::new(DEFAULT_CONFIG_FILE);
        let file = explicit.or_else(|| default_file.exists().then_some(default_file));

        let mut config = match file.map(Self::from_file) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("{e}; falling back to default configuration");
                Self::default()
            }
            None => Self::default(),
        };

        if let Some(dir) = data_dir {
            config = config.with_data_dir(dir);
        }
        config
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::JsonParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Point both data files at `dir`, keeping the standard file names.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.day_path = dir.join(DAY_FILE);
        self.hour_path = dir.join(HOUR_FILE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("bike_dashboard_{name}"))
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("config_partial.json");
        fs::write(&path, r#"{ "logo_path": "img/bike.png" }"#).unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.logo_path, PathBuf::from("img/bike.png"));
        assert_eq!(config.day_path, DashboardConfig::default().day_path);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let path = temp_path("config_unknown.json");
        fs::write(&path, r#"{ "colour": "red" }"#).unwrap();

        assert!(matches!(
            DashboardConfig::from_file(&path),
            Err(ConfigError::JsonParse { .. })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_explicit_missing_file_falls_back_to_defaults() {
        let path = temp_path("config_missing.json");
        assert!(matches!(
            DashboardConfig::from_file(&path),
            Err(ConfigError::NotFound { .. })
        ));
        assert_eq!(DashboardConfig::resolve(Some(&path), None), DashboardConfig::default());
    }

    #[test]
    fn test_malformed_file_still_applies_data_dir() {
        let path = temp_path("config_malformed.json");
        fs::write(&path, "{ not json").unwrap();

        let config = DashboardConfig::resolve(Some(&path), Some(Path::new("/data/bikes")));
        assert_eq!(config.day_path, PathBuf::from("/data/bikes/day_data.csv"));
        assert_eq!(config.hour_path, PathBuf::from("/data/bikes/hour_data.csv"));
        assert_eq!(config.logo_path, DashboardConfig::default().logo_path);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_data_dir_override() {
        let path = temp_path("config_dir.json");
        fs::write(&path, r#"{ "day_path": "elsewhere/day.csv" }"#).unwrap();

        let config = DashboardConfig::resolve(Some(&path), Some(Path::new("/data/bikes")));
        assert_eq!(config.day_path, PathBuf::from("/data/bikes/day_data.csv"));
        assert_eq!(config.hour_path, PathBuf::from("/data/bikes/hour_data.csv"));

        fs::remove_file(&path).unwrap();
    }
}
