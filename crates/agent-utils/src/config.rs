//! Application-level configuration

use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the deployment environment
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development or production)
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "agent-rs".to_string(),
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// Config for `app_name`, environment read from `APP_ENV`
    ///
    /// An unset or unrecognised `APP_ENV` means development.
    pub fn from_env(app_name: impl Into<String>) -> Self {
        Self::from_lookup(app_name, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary lookup function
    pub fn from_lookup(app_name: impl Into<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup(ENV_APP_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self {
            app_name: app_name.into(),
            environment,
        }
    }

    /// Log format suited to the environment: JSON in production
    pub fn log_format(&self) -> LogFormat {
        match self.environment {
            Environment::Development => LogFormat::Text,
            Environment::Production => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup("trading-cli", |_| Some("prod".to_string()));
        assert_eq!(config.app_name, "trading-cli");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_format(), LogFormat::Json);

        let config = Config::from_lookup("trading-cli", |_| Some("staging".to_string()));
        assert_eq!(config.environment, Environment::Development);

        let config = Config::from_lookup("trading-cli", |_| None);
        assert_eq!(config.log_format(), LogFormat::Text);
    }

    #[test]
    fn test_environment_display_round_trip() {
        for env in [Environment::Development, Environment::Production] {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }
}
