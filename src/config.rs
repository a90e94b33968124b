use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_INTERVAL_MINUTES: u64 = 3;
const DEFAULT_DATABASE_FILE: &str = "repos.db";

/// Runtime configuration, sourced from environment variables.
///
/// Required: `TELEGRAM_TOKEN`, `TELEGRAM_CHANNEL_ID`, `GITHUB_USERNAME`.
/// Optional: `CHECK_INTERVAL_MINUTES` (default 3), `DATABASE_FILE`
/// (default `repos.db`, relative to the working directory).
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token
    pub telegram_token: String,

    /// Target channel identifier (numeric id or @channelname)
    pub telegram_channel_id: String,

    /// GitHub account whose repositories are watched
    pub github_username: String,

    /// Polling interval between reconciliation passes
    pub check_interval: Duration,

    /// Path of the SQLite ledger file
    pub database_file: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`Config::from_env`] so tests can feed values without
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = required(&lookup, "TELEGRAM_TOKEN")?;
        let telegram_channel_id = required(&lookup, "TELEGRAM_CHANNEL_ID")?;
        let github_username = required(&lookup, "GITHUB_USERNAME")?;

        let check_interval = match lookup("CHECK_INTERVAL_MINUTES") {
            Some(raw) => {
                let minutes: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "CHECK_INTERVAL_MINUTES",
                    value: raw.clone(),
                    reason: "expected a whole number of minutes".to_string(),
                })?;
                if minutes == 0 {
                    return Err(ConfigError::Invalid {
                        var: "CHECK_INTERVAL_MINUTES",
                        value: raw,
                        reason: "interval must be at least one minute".to_string(),
                    });
                }
                Duration::from_secs(minutes * 60)
            }
            None => Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60),
        };

        let database_file = lookup("DATABASE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));

        Ok(Self {
            telegram_token,
            telegram_channel_id,
            github_username,
            check_interval,
            database_file,
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHANNEL_ID", "@releases"),
            ("GITHUB_USERNAME", "octocat"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|var| env.get(var).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&full_env()).unwrap();

        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.telegram_channel_id, "@releases");
        assert_eq!(config.github_username, "octocat");
        assert_eq!(config.check_interval, Duration::from_secs(3 * 60));
        assert_eq!(config.database_file, PathBuf::from("repos.db"));
    }

    #[test]
    fn test_optional_overrides() {
        let mut env = full_env();
        env.insert("CHECK_INTERVAL_MINUTES", "10");
        env.insert("DATABASE_FILE", "/var/lib/repoherald/state.db");

        let config = load(&env).unwrap();
        assert_eq!(config.check_interval, Duration::from_secs(600));
        assert_eq!(
            config.database_file,
            PathBuf::from("/var/lib/repoherald/state.db")
        );
    }

    #[test]
    fn test_missing_required_var() {
        for var in ["TELEGRAM_TOKEN", "TELEGRAM_CHANNEL_ID", "GITHUB_USERNAME"] {
            let mut env = full_env();
            env.remove(var);

            match load(&env) {
                Err(ConfigError::Missing(missing)) => assert_eq!(missing, var),
                other => panic!("expected Missing({}), got {:?}", var, other),
            }
        }
    }

    #[test]
    fn test_blank_required_var_is_missing() {
        let mut env = full_env();
        env.insert("GITHUB_USERNAME", "   ");

        assert!(matches!(
            load(&env),
            Err(ConfigError::Missing("GITHUB_USERNAME"))
        ));
    }

    #[test]
    fn test_invalid_interval() {
        let mut env = full_env();
        env.insert("CHECK_INTERVAL_MINUTES", "soon");
        assert!(matches!(load(&env), Err(ConfigError::Invalid { .. })));

        env.insert("CHECK_INTERVAL_MINUTES", "0");
        assert!(matches!(load(&env), Err(ConfigError::Invalid { .. })));
    }
}
