//! Configuration for opening a [`crate::persistence::Store`].
//!
//! Defaults live in [`StoreConfig::default`]. The environment (and a `.env`
//! file, if one is around) can override them:
//!
//! - `TESSERA_DATABASE`: path of the SQLite file, or `:memory:`
//! - `TESSERA_BUSY_TIMEOUT_MS`: how long SQLite waits on a locked database

use std::{path::PathBuf, time::Duration};

use crate::error::{EavError, Result};

pub const DATABASE_ENV: &str = "TESSERA_DATABASE";
pub const BUSY_TIMEOUT_ENV: &str = "TESSERA_BUSY_TIMEOUT_MS";

const DEFAULT_DATABASE_FILE: &str = "tessera.db";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MEMORY_MARKER: &str = ":memory:";

/// Where the backing store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorePath {
    File(PathBuf),
    Memory,
}

impl StorePath {
    pub fn parse(raw: &str) -> StorePath {
        if raw == MEMORY_MARKER {
            StorePath::Memory
        } else {
            StorePath::File(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: StorePath,
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: StorePath::File(PathBuf::from(DEFAULT_DATABASE_FILE)),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    pub fn in_memory() -> StoreConfig {
        StoreConfig {
            path: StorePath::Memory,
            ..StoreConfig::default()
        }
    }

    pub fn from_env() -> Result<StoreConfig> {
        //! Read the configuration from the process environment after loading
        //! a `.env` file from the working directory, if there is one.
        //!
        //! A missing `.env` file is fine; a malformed one is not.

        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(error) if error.not_found() => {}
            Err(error) => return Err(EavError::Config(error.to_string())),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<StoreConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = StoreConfig::builder();

        if let Some(raw) = lookup(DATABASE_ENV) {
            if raw.trim().is_empty() {
                return Err(EavError::Config(format!("{} is empty", DATABASE_ENV)));
            }
            builder = builder.path(StorePath::parse(raw.trim()));
        }

        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let millis = raw.trim().parse::<u64>().map_err(|_| {
                EavError::Config(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    BUSY_TIMEOUT_ENV, raw
                ))
            })?;
            builder = builder.busy_timeout(Duration::from_millis(millis));
        }

        Ok(builder.build())
    }
}

#[derive(Default)]
pub struct StoreConfigBuilder {
    path: Option<StorePath>,
    busy_timeout: Option<Duration>,
}

impl StoreConfigBuilder {
    pub fn path(mut self, path: StorePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn file(self, path: impl Into<PathBuf>) -> Self {
        self.path(StorePath::File(path.into()))
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            path: self.path.unwrap_or(defaults.path),
            busy_timeout: self.busy_timeout.unwrap_or(defaults.busy_timeout),
        }
    }
}
