use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::services::random::RandomFetch;
use crate::services::source::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub seed_demo: bool,
    pub random_fetch: RandomFetch,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            api_base: DEFAULT_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed_demo: false,
            random_fetch: RandomFetch::SearchOffset,
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(local) = env::var("LOCALAPPDATA") {
        return PathBuf::from(local).join("RecipeBoard");
    }
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("RecipeBoard")
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("RECIPE_API_KEY") {
            cfg.api_key = key;
        }
        if let Some(base) = get("RECIPE_API_BASE") {
            cfg.api_base = base;
        }
        if let Some(dir) = get("RECIPE_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(v) = get("RECIPE_HTTP_TIMEOUT_SECS") {
            let secs = v
                .parse::<u64>()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: "RECIPE_HTTP_TIMEOUT_SECS",
                    value: v.clone(),
                })?;
            cfg.http_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("RECIPE_SEED_DEMO") {
            cfg.seed_demo = parse_bool("RECIPE_SEED_DEMO", &v)?;
        }
        if let Some(v) = get("RECIPE_RANDOM_ENDPOINT") {
            if parse_bool("RECIPE_RANDOM_ENDPOINT", &v)? {
                cfg.random_fetch = RandomFetch::Endpoint;
            }
        }

        Ok(cfg)
    }

    pub fn log_summary(&self) {
        if self.api_key.is_empty() {
            warn!("RECIPE_API_KEY is not set; the recipe API will reject requests");
        }
        info!(
            api_base = %self.api_base,
            data_dir = %self.data_dir.display(),
            timeout_secs = self.http_timeout.as_secs(),
            seed_demo = self.seed_demo,
            random_fetch = ?self.random_fetch,
            "configuration loaded"
        );
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.api_base, DEFAULT_BASE_URL);
        assert_eq!(cfg.http_timeout, Duration::from_secs(15));
        assert!(!cfg.seed_demo);
        assert_eq!(cfg.random_fetch, RandomFetch::SearchOffset);
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("RECIPE_API_KEY", " abc "),
            ("RECIPE_DATA_DIR", "/tmp/board"),
            ("RECIPE_HTTP_TIMEOUT_SECS", "3"),
            ("RECIPE_SEED_DEMO", "yes"),
            ("RECIPE_RANDOM_ENDPOINT", "true"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/board"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
        assert!(cfg.seed_demo);
        assert_eq!(cfg.random_fetch, RandomFetch::Endpoint);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("RECIPE_HTTP_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("RECIPE_HTTP_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("RECIPE_SEED_DEMO", "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
    }
}
