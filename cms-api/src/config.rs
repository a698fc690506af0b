//! Configuration management using Figment
//!
//! Configuration is loaded from the following sources, highest precedence first:
//! 1. Environment variables (prefix `CMS_`, nested keys separated by `__`,
//!    e.g. `CMS_API__LIMIT=50`)
//! 2. A TOML file, `./config.toml` by default
//! 3. Default values
//!
//! ```toml
//! [service]
//! name = "pyramid-cms"
//! log_level = "debug"
//!
//! [api]
//! limit = 25
//!
//! [api.resources.page]
//! allowed_methods = ["get", "put"]
//! authentication = "session"
//! authorization = "acl"
//! ```

use std::collections::HashMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resource::{
    build_config, ResourceConfig, ResourceOptions, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT,
    DEFAULT_PREFIX,
};

/// Default configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CMS_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Resource defaults and per-resource overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// URL prefix resources are mounted under
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_limit")]
    pub limit: u64,

    #[serde(default = "default_max_limit")]
    pub max_limit: u64,

    #[serde(default)]
    pub always_return_data: bool,

    /// Overrides keyed by resource name
    #[serde(default)]
    pub resources: HashMap<String, ResourceOptions>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn default_max_limit() -> u64 {
    DEFAULT_MAX_LIMIT
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            limit: default_limit(),
            max_limit: default_max_limit(),
            always_return_data: false,
            resources: HashMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "pyramid-cms".to_string(),
                log_level: default_log_level(),
            },
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `./config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        } else {
            tracing::debug!("No configuration file at {}", path.display());
        }

        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Defaults shared by every resource, before per-resource overrides
    pub fn resource_defaults<O: 'static>(&self) -> ResourceConfig<O> {
        ResourceConfig::new()
            .with_limit(self.api.limit)
            .with_max_limit(self.api.max_limit)
            .with_always_return_data(self.api.always_return_data)
    }

    /// Effective configuration for the resource called `name`
    pub fn resource_config<O: 'static>(&self, name: &str) -> ResourceConfig<O> {
        let defaults = self.resource_defaults();
        match self.api.resources.get(name) {
            Some(overrides) => build_config(&defaults, overrides),
            None => defaults,
        }
    }
}
