use std::path::{Path, PathBuf};
use std::{env, fs, time::Duration};

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_OTP_BASE_URL: &str = "http://localhost:5002/api";
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_STORAGE_DIR: &str = ".quickcart";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// Where the storefront finds its backends and keeps on-device state.
#[derive(Clone, Debug, PartialEq)]
pub struct StorefrontConfig {
    pub api_base_url: String,
    pub otp_base_url: String,
    pub api_timeout: Duration,
    pub use_mock_data: bool,
    pub auth_token: Option<String>,
    pub storage_dir: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            otp_base_url: DEFAULT_OTP_BASE_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            use_mock_data: false,
            auth_token: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

// Every key is optional; missing ones keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    otp_base_url: Option<String>,
    api_timeout_ms: Option<u64>,
    use_mock_data: Option<bool>,
    auth_token: Option<String>,
    storage_dir: Option<PathBuf>,
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        // Load .env locally; safe to ignore when not present.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(defaults.api_base_url),
            otp_base_url: file.otp_base_url.unwrap_or(defaults.otp_base_url),
            api_timeout: file
                .api_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.api_timeout),
            use_mock_data: file.use_mock_data.unwrap_or(defaults.use_mock_data),
            auth_token: non_blank(file.auth_token),
            storage_dir: file.storage_dir.unwrap_or(defaults.storage_dir),
        })
    }

    // The React app's variable names are still honoured so one .env serves both.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("API_BASE_URL")
                .or_else(|| lookup("REACT_APP_API_URL"))
                .unwrap_or(defaults.api_base_url),
            otp_base_url: lookup("OTP_API_URL").unwrap_or(defaults.otp_base_url),
            api_timeout: lookup("API_TIMEOUT_MS")
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.api_timeout),
            use_mock_data: lookup("USE_MOCK_DATA")
                .or_else(|| lookup("REACT_APP_USE_MOCK_DATA"))
                .map(|value| parse_flag(&value))
                .unwrap_or(defaults.use_mock_data),
            auth_token: non_blank(lookup("STOREFRONT_AUTH_TOKEN")),
            storage_dir: lookup("STOREFRONT_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
