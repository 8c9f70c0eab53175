//! Environment-based configuration.
//!
//! All configuration is read once at startup from environment variables
//! and is immutable afterwards. The three Jira credentials are required;
//! the process refuses to start without them.

use crate::{Error, Result};

/// Default listen port when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Jira instance host, e.g. `your-domain.atlassian.net`
    pub jira_host: String,
    /// Account email for basic auth
    pub jira_email: String,
    /// API token for basic auth
    pub jira_api_token: String,
    /// HTTP listen port
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an explicit lookup function.
    ///
    /// Split out from [`Config::from_env`] so tests do not have to mutate
    /// process-global environment variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jira_host = require(&lookup, "JIRA_HOST")?;
        let jira_email = require(&lookup, "JIRA_EMAIL")?;
        let jira_api_token = require(&lookup, "JIRA_API_TOKEN")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a number, got '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            jira_host,
            jira_email,
            jira_api_token,
            port,
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "Missing required environment variable: {}",
            key
        ))),
    }
}
