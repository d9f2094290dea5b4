// File: mojito-core/src/config.rs

// Runtime configuration: backend location, where the session lives on disk,
// and how long a boundary call may take. Values come from explicit
// overrides first, then the environment (after loading `.env`), then defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::store::LogoutPolicy;
use crate::Error;

pub const DEFAULT_BACKEND_URL: &str = "https://mojitosocialapp.herokuapp.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_BACKEND_URL: &str = "MOJITO_BACKEND_URL";
/// Older deployments only set this one.
pub const ENV_BACKEND_URL_LEGACY: &str = "BACKENDURL";
pub const ENV_STORAGE_PATH: &str = "MOJITO_STORAGE_PATH";
pub const ENV_REQUEST_TIMEOUT: &str = "MOJITO_REQUEST_TIMEOUT_SECS";
pub const ENV_CLEAR_USER_ON_LOGOUT: &str = "MOJITO_CLEAR_USER_ON_LOGOUT";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: Url,
    pub storage_path: PathBuf,
    pub request_timeout: Duration,
    pub logout_policy: LogoutPolicy,
}

/// Values given on the command line; `None` falls through to env/defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub clear_user_on_logout: Option<bool>,
}

impl AppConfig {
    /// Load `.env` (if any) and resolve the configuration.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, Error> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("loaded environment from {}", path.display());
        }
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolution without touching the process environment.
    pub fn resolve(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let raw_url = overrides
            .backend_url
            .or_else(|| lookup(ENV_BACKEND_URL))
            .or_else(|| lookup(ENV_BACKEND_URL_LEGACY))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let backend_url = Url::parse(&raw_url)
            .map_err(|e| Error::Config(format!("invalid backend url '{}': {}", raw_url, e)))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "backend url must be http(s), got '{}'",
                backend_url.scheme()
            )));
        }

        let storage_path = match overrides
            .storage_path
            .or_else(|| lookup(ENV_STORAGE_PATH).map(PathBuf::from))
        {
            Some(p) => p,
            None => default_storage_path()?,
        };

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => secs,
            None => match lookup(ENV_REQUEST_TIMEOUT) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    Error::Config(format!("invalid {} '{}': {}", ENV_REQUEST_TIMEOUT, raw, e))
                })?,
                None => DEFAULT_REQUEST_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(Error::Config("request timeout must be at least 1 second".into()));
        }

        let clear_user = overrides.clear_user_on_logout.unwrap_or_else(|| {
            lookup(ENV_CLEAR_USER_ON_LOGOUT)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        });
        let logout_policy = if clear_user {
            LogoutPolicy::ClearUser
        } else {
            LogoutPolicy::RetainUser
        };

        Ok(Self {
            backend_url,
            storage_path,
            request_timeout: Duration::from_secs(timeout_secs),
            logout_policy,
        })
    }
}

fn default_storage_path() -> Result<PathBuf, Error> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| Error::Config("no data directory available; set MOJITO_STORAGE_PATH".into()))?;
    Ok(base.join("mojito").join("session.json"))
}
