//! Agent configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use guardpost_core::position::DEFAULT_POSITION_TIMEOUT;
use guardpost_core::types::DbId;

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Base URL of the API, without the `/api/v1` prefix.
    pub api_url: String,
    pub guard_id: DbId,
    /// JSON file the device's location daemon keeps up to date.
    pub position_file: PathBuf,
    pub position_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `GUARDPOST_API_URL`     | yes      | --      |
    /// | `GUARD_ID`              | yes      | --      |
    /// | `POSITION_FILE`         | yes      | --      |
    /// | `POSITION_TIMEOUT_SECS` | no       | `10`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let api_url = required("GUARDPOST_API_URL")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let raw_guard_id = required("GUARD_ID")?;
        let guard_id: DbId = raw_guard_id
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var: "GUARD_ID",
                expected: "a valid integer",
                value: raw_guard_id.clone(),
            })?;

        let position_file = PathBuf::from(required("POSITION_FILE")?);

        let position_timeout = match lookup("POSITION_TIMEOUT_SECS") {
            None => DEFAULT_POSITION_TIMEOUT,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "POSITION_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: raw.clone(),
                })?,
        };

        Ok(Self {
            api_url,
            guard_id,
            position_file,
            position_timeout,
        })
    }
}
