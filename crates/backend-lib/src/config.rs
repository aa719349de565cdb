// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::password::{DEFAULT_HASH_COST, MAX_HASH_COST};
use crate::auth::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};
use crate::auth::session::SESSION_TTL_SECS;
use crate::error::ConfigError;


/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides, e.g. `BALLOT_RATE_LIMIT__MAX_REQUESTS`
pub const ENV_PREFIX: &str = "BALLOT_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Password hash work factor
    pub hash_cost: u8,
    /// Mark the session cookie `Secure` (production)
    pub secure_cookies: bool,
    /// Require a single-use `x-csrf-token` header on state-changing auth routes
    pub csrf_protection: bool,
    /// Rate limiting for register and login
    pub rate_limit: RateLimitSettings,
}

/// Fixed-window limits applied per `<action>:<client address>`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            log_json: false,
            session_ttl_secs: SESSION_TTL_SECS as u64,
            hash_cost: DEFAULT_HASH_COST,
            secure_cookies: false,
            csrf_protection: false,
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS as u64,
        }
    }
}

impl Settings {
    /// Load from `config.toml` in the working directory plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific TOML file plus the environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    /// Extract and validate
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment.extract().map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would run the server in a weakened state
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::LogLevel(self.log_level.clone()));
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::SessionTtl(self.session_ttl_secs));
        }
        if self.hash_cost == 0 || self.hash_cost > MAX_HASH_COST {
            return Err(ConfigError::HashCost(self.hash_cost));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::RateLimit("max_requests"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::RateLimit("window_secs"));
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::seconds(self.rate_limit.window_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }
}
