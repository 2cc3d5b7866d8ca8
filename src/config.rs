use std::collections::HashMap;
use std::env;
use lazy_static::lazy_static;
use crate::errors::ConfigError;
use crate::models::Credentials;

pub const ENV_BASE_URL: &str = "ANALYTICS_BASE_URL";
pub const ENV_USERNAME: &str = "ANALYTICS_USERNAME";
pub const ENV_PASSWORD: &str = "ANALYTICS_PASSWORD";

pub const CACHE_DURATION_SECS: u64 = 30;
pub const DEFAULT_AUTH_RETRIES: u32 = 1; // re-logins allowed per request after a 401
pub const DEFAULT_WEBSITE_ALIAS: &str = "codefe";
pub const STATS_START_AT: u64 = 0;
pub const STATS_END_AT: u64 = 9_999_999_999_999;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

pub type AliasTable = HashMap<&'static str, &'static str>;

lazy_static! {
    pub static ref PRIMARY_WEBSITES: AliasTable = {
        let mut m = HashMap::new();
        m.insert("codefe", "b02f2e6d-d898-4f11-913a-0a94e31dbf78");
        m.insert("hmxy", "fd22bd9c-f397-4a28-8f5d-7c0ca92397b7");
        m.insert("poetry", "1f32c8c2-8a60-482c-99b7-d6db36cd43a8");
        m
    };

    pub static ref SECONDARY_WEBSITES: AliasTable = {
        let mut m = HashMap::new();
        m.insert("codefe", "b02f2e6d-d898-4f11-913a-0a94e31dbf78");
        m.insert("hmxy", "fd22bd9c-f397-4a28-8f5d-7c0ca92397b7");
        m.insert("poetry", "5591c5cd-9139-4779-acca-d4fef1aecf37");
        m
    };
}

/// A deployment of the proxy: its own port and alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Instance {
    Primary,
    Secondary,
}

impl Instance {
    pub const ALL: [Instance; 2] = [Instance::Primary, Instance::Secondary];

    pub fn port(self) -> u16 {
        match self {
            Self::Primary => 4001,
            Self::Secondary => 4002,
        }
    }

    pub fn aliases(self) -> &'static AliasTable {
        match self {
            Self::Primary => &PRIMARY_WEBSITES,
            Self::Secondary => &SECONDARY_WEBSITES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl Credentials {
    /// Reads the upstream credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        Ok(Self {
            base_url: require(ENV_BASE_URL)?.trim_end_matches('/').to_string(),
            username: require(ENV_USERNAME)?,
            password: require(ENV_PASSWORD)?,
        })
    }
}
