//! Environment-driven configuration shared by the store adapter and the
//! scan session runtime.

use std::time::Duration;

/// Env var holding the PostgreSQL connection URL of the hosted store.
pub const STORE_URL_VAR: &str = "STORE_URL";
/// Env var holding the access key (connection password) for the hosted store.
pub const STORE_ACCESS_KEY_VAR: &str = "STORE_ACCESS_KEY";

/// Default delay between a badge scan and the ticket scan step.
pub const DEFAULT_ACK_DELAY: Duration = Duration::from_millis(2000);
/// Default delay before a successful link resets for the next attendee.
pub const DEFAULT_SUCCESS_RESET_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection parameters for the hosted store.
///
/// Both values are required; there is no local fallback.
#[derive(Clone)]
pub struct StoreConfig {
    pub url: String,
    pub access_key: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

impl StoreConfig {
    /// Load `STORE_URL` and `STORE_ACCESS_KEY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        Ok(Self {
            url: required(STORE_URL_VAR)?,
            access_key: required(STORE_ACCESS_KEY_VAR)?,
        })
    }
}

/// Presentation delays used by the scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTimings {
    /// How long the "badge scanned" acknowledgement stays up.
    pub ack_delay: Duration,
    /// How long the success screen stays up before the automatic reset.
    pub success_reset_delay: Duration,
}

impl Default for ScanTimings {
    fn default() -> Self {
        Self {
            ack_delay: DEFAULT_ACK_DELAY,
            success_reset_delay: DEFAULT_SUCCESS_RESET_DELAY,
        }
    }
}

impl ScanTimings {
    /// Load timings from the environment.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `SCAN_ACK_DELAY_MS`     | `2000`  |
    /// | `SCAN_SUCCESS_RESET_MS` | `3000`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |var: &'static str, default: Duration| match lookup(var) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::Invalid {
                    var,
                    reason: e.to_string(),
                }),
        };

        Ok(Self {
            ack_delay: millis("SCAN_ACK_DELAY_MS", DEFAULT_ACK_DELAY)?,
            success_reset_delay: millis("SCAN_SUCCESS_RESET_MS", DEFAULT_SUCCESS_RESET_DELAY)?,
        })
    }
}
