//! Process-wide tuning knobs.
//!
//! The library reads a single [`Config`] lazily on first use. Applications can
//! install their own with [`Config::configure_global`] before that happens;
//! otherwise it is built from the environment by [`Config::from_env`].

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`Config::default_parallelism`].
pub const PARALLELISM_ENV: &str = "QUARRY_PARALLELISM";

/// Environment variable overriding [`Config::channel_capacity`].
pub const CHANNEL_CAPACITY_ENV: &str = "QUARRY_CHANNEL_CAPACITY";

static GLOBAL: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker ceiling used by `par_for_each` when the caller passes a
    /// concurrency of zero. `None` means the host's available parallelism.
    pub default_parallelism: Option<usize>,
    /// Buffer size of channels created by `to_channel`.
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_parallelism: None,
            channel_capacity: 16,
        }
    }
}

impl Config {
    /// Builds a configuration from the defaults, overridden by
    /// `QUARRY_PARALLELISM` and `QUARRY_CHANNEL_CAPACITY`.
    ///
    /// Values that do not parse as a positive integer are ignored.
    pub fn from_env() -> Config {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let positive = |name: &str| {
            lookup(name)
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
        };
        let mut config = Config::default();
        if let Some(n) = positive(PARALLELISM_ENV) {
            config.default_parallelism = Some(n);
        }
        if let Some(n) = positive(CHANNEL_CAPACITY_ENV) {
            config.channel_capacity = n;
        }
        config
    }

    /// Installs `config` as the process-wide configuration.
    ///
    /// Returns `false` if the global configuration was already initialized, in
    /// which case `config` is discarded.
    pub fn configure_global(config: Config) -> bool {
        GLOBAL.set(config).is_ok()
    }

    /// Returns the process-wide configuration, initializing it from the
    /// environment on first access.
    pub fn global() -> &'static Config {
        GLOBAL.get_or_init(Config::from_env)
    }

    /// Resolves the parallelism ceiling:
    /// 1. `default_parallelism` if set
    /// 2. otherwise the host's available parallelism
    /// 3. falls back to 8 if that cannot be determined
    pub fn effective_parallelism(&self) -> usize {
        match self.default_parallelism {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(8),
        }
    }
}
