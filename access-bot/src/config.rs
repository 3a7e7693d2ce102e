use crate::error::ConfigError;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_STAFF_COLLECTION: &str = "staff";
/// Expands the `keys` junction and the access item each row points at
pub const DEFAULT_STAFF_FIELDS: &str = "*,keys.*.*";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub directus_url: String,
    pub directus_token: String,
    pub staff_collection: String,
    pub staff_fields: String,
    pub request_timeout: Duration,
    pub health_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let request_timeout_secs = match get("DIRECTUS_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid { key: "DIRECTUS_TIMEOUT_SECS", value: raw }),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let health_port = match get("HEALTH_PORT") {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|_| ConfigError::Invalid { key: "HEALTH_PORT", value: raw })?,
            ),
            None => None,
        };

        Ok(Self {
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            directus_url: required("DIRECTUS_URL")?.trim_end_matches('/').to_string(),
            directus_token: required("DIRECTUS_TOKEN")?,
            staff_collection: get("DIRECTUS_STAFF_COLLECTION")
                .unwrap_or_else(|| DEFAULT_STAFF_COLLECTION.to_string()),
            staff_fields: get("DIRECTUS_STAFF_FIELDS")
                .unwrap_or_else(|| DEFAULT_STAFF_FIELDS.to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            health_port,
        })
    }
}

// Tokens stay out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("directus_url", &self.directus_url)
            .field("directus_token", &"<redacted>")
            .field("staff_collection", &self.staff_collection)
            .field("staff_fields", &self.staff_fields)
            .field("request_timeout", &self.request_timeout)
            .field("health_port", &self.health_port)
            .finish()
    }
}
