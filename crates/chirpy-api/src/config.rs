//! Service configuration loaded from the environment (and `.env`, if present).

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "database.json";
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
/// One year. Longer lifetimes are refused at load time.
pub const MAX_ACCESS_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC key for access tokens
    pub jwt_secret: String,
    /// Shared key the billing provider presents on webhooks
    pub polka_key: String,
    pub db_path: PathBuf,
    /// Default access-token lifetime, also the longest a client may request.
    pub access_token_ttl: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            jwt_secret: "test-jwt-secret".to_string(),
            polka_key: "test-polka-key".to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            access_token_ttl: DEFAULT_ACCESS_TTL_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token_ttl = match lookup("CHIRPY_ACCESS_TTL_SECS") {
            None => DEFAULT_ACCESS_TTL_SECS,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(ttl) if ttl > 0 && ttl <= MAX_ACCESS_TTL_SECS => ttl,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CHIRPY_ACCESS_TTL_SECS",
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            jwt_secret: lookup("JWT_SECRET")
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            polka_key: lookup("POLKA_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("POLKA_KEY"))?,
            db_path: lookup("CHIRPY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            access_token_ttl,
        })
    }
}
