use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://lane-website.netlify.app";
pub const ENV_API_URL: &str = "LANE_API_URL";
pub const ENV_AUTH_TOKEN: &str = "LANE_TOKEN";
pub const ENV_STRIPE_KEY: &str = "STRIPE_KEY";

const CONFIG_DIR_NAME: &str = ".lane";

/// Settings resolved once per invocation and handed to each command.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token_override: Option<String>,
    pub stripe_key: Option<String>,
    pub config_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::from_lookup(home.join(CONFIG_DIR_NAME), |key| {
            env::var(key).ok()
        }))
    }

    fn from_lookup<F>(config_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let api_url = non_empty(ENV_API_URL)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            api_url,
            token_override: non_empty(ENV_AUTH_TOKEN),
            stripe_key: non_empty(ENV_STRIPE_KEY),
            config_dir,
        }
    }
}

/// Timing of the login poll loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(5 * 60),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub const INVOICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(PathBuf::from("/home/test/.lane"), |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_with(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.token_override, None);
        assert_eq!(config.stripe_key, None);
    }

    #[test]
    fn api_url_override_drops_trailing_slash() {
        let config = config_with(&[(ENV_API_URL, "http://localhost:3000/")]);
        assert_eq!(config.api_url, "http://localhost:3000");
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = config_with(&[
            (ENV_API_URL, ""),
            (ENV_AUTH_TOKEN, ""),
            (ENV_STRIPE_KEY, ""),
        ]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.token_override, None);
        assert_eq!(config.stripe_key, None);
    }

    #[test]
    fn token_override_is_kept_verbatim() {
        let config = config_with(&[(ENV_AUTH_TOKEN, "ci-token ")]);
        assert_eq!(config.token_override.as_deref(), Some("ci-token "));
    }
}
