use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Agenda";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that relocates the whole data directory.
pub const DATA_DIR_ENV: &str = "AGENDA_DATA_DIR";

/// Optional settings file, looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_APPOINTMENTS_FILE: &str = "appuntamenti.csv";
pub const DEFAULT_USERS_FILE: &str = "users.json";
pub const DEFAULT_CHAT_BASE_URL: &str = "https://wa.me";
/// Italy, written without the leading `+`.
pub const DEFAULT_COUNTRY_CODE: &str = "39";
pub const DEFAULT_PRACTITIONER: &str = "dottoressa Pezzella";

/// Get the application data directory
/// ~/Agenda/ by default, falling back to the working directory when no home
/// directory can be determined.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "agenda_lib=info,agenda=info,reset_users=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Runtime settings. Every field has a default, so a partial `config.json`
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Relative paths resolve against `data_dir`.
    pub appointments_file: PathBuf,
    pub users_file: PathBuf,
    pub chat_base_url: String,
    pub country_code: String,
    /// Named at the end of every reminder ("presso lo studio della ...").
    pub practitioner: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_data_dir(app_data_dir())
    }
}

impl AppConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            appointments_file: PathBuf::from(DEFAULT_APPOINTMENTS_FILE),
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            chat_base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            practitioner: DEFAULT_PRACTITIONER.to_string(),
        }
    }

    /// Load settings from `<data_dir>/config.json` if it exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&app_data_dir())
    }

    pub fn load_from(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::with_data_dir(data_dir));
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        // The file lives in the data dir, so it cannot meaningfully move it.
        config.data_dir = data_dir.to_path_buf();
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn appointments_path(&self) -> PathBuf {
        self.data_dir.join(&self.appointments_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_agenda() {
        assert_eq!(APP_NAME, "Agenda");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.country_code, "39");
        assert_eq!(config.chat_base_url, "https://wa.me");
        assert_eq!(
            config.appointments_path(),
            dir.path().join("appuntamenti.csv")
        );
        assert_eq!(config.users_path(), dir.path().join("users.json"));
    }

    #[test]
    fn partial_config_overrides_named_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"practitioner": "dottor Bianchi", "data_dir": "/elsewhere"}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.practitioner, "dottor Bianchi");
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.users_file, PathBuf::from("users.json"));
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let result = AppConfig::load_from(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn absolute_file_paths_are_kept() {
        let mut config = AppConfig::with_data_dir("/data");
        config.users_file = PathBuf::from("/secure/users.json");
        assert_eq!(config.users_path(), PathBuf::from("/secure/users.json"));
    }
}
