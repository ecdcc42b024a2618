use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

/// Application-level constants
pub const APP_NAME: &str = "HMS";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Listen address when `HMS_BIND_ADDR` is unset. The browser front end
/// targets this port.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9004";

const DB_FILE_NAME: &str = "hms.db";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "hms=info,hms_lib=info,tower_http=warn"
}

/// Get the application data directory: `~/HMS/`, or `./HMS/` when no home
/// directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value:?} is not a socket address")]
    BindAddr { var: &'static str, value: String },
    #[error("Invalid {var}: must not be empty")]
    Empty { var: &'static str },
    #[error("Invalid {var}: {value:?} is not a valid origin header")]
    CorsOrigin { var: &'static str, value: String },
}

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Allowed browser origin. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = match lookup("HMS_DB_PATH") {
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Empty { var: "HMS_DB_PATH" }),
            Some(v) => PathBuf::from(v),
            None => app_data_dir().join(DB_FILE_NAME),
        };

        let raw_addr = lookup("HMS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.trim().parse().map_err(|_| ConfigError::BindAddr {
            var: "HMS_BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let cors_origin = match lookup("HMS_CORS_ORIGIN").map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(HeaderValue::from_str(&v).map_err(|_| {
                ConfigError::CorsOrigin {
                    var: "HMS_CORS_ORIGIN",
                    value: v.clone(),
                }
            })?),
            _ => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            cors_origin,
        })
    }
}
