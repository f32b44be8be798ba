//! Client configuration resolved at build time.
//!
//! SYSTEM CONTEXT
//! ==============
//! The WASM bundle has no process environment, so values are baked in through
//! `option_env!` when the crate is compiled. `from_lookup` keeps parsing
//! testable with any key source.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RESTORE_GRACE_MS: u64 = 300;
pub const DEFAULT_LANDING: &str = "/home";

pub const API_BASE_URL_KEY: &str = "RESUME_API_BASE_URL";
pub const REQUEST_TIMEOUT_KEY: &str = "RESUME_API_TIMEOUT_MS";
pub const RESTORE_GRACE_KEY: &str = "RESUME_RESTORE_GRACE_MS";
pub const DEFAULT_LANDING_KEY: &str = "RESUME_DEFAULT_LANDING";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the REST API, without a trailing slash.
    pub api_base_url: String,
    /// Upper bound for any single API request.
    pub request_timeout_ms: u64,
    /// How long a guarded route keeps the placeholder up while a stored
    /// credential has not yet produced an authenticated session.
    pub restore_grace_ms: u64,
    /// Where login/signup land when no redirect is pending.
    pub default_landing: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            restore_grace_ms: DEFAULT_RESTORE_GRACE_MS,
            default_landing: DEFAULT_LANDING.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build config from values captured at compile time.
    ///
    /// Optional:
    /// - `RESUME_API_BASE_URL`: default `http://localhost:3333`
    /// - `RESUME_API_TIMEOUT_MS`: default 15000
    /// - `RESUME_RESTORE_GRACE_MS`: default 300
    /// - `RESUME_DEFAULT_LANDING`: default `/home`
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                API_BASE_URL_KEY => option_env!("RESUME_API_BASE_URL"),
                REQUEST_TIMEOUT_KEY => option_env!("RESUME_API_TIMEOUT_MS"),
                RESTORE_GRACE_KEY => option_env!("RESUME_RESTORE_GRACE_MS"),
                DEFAULT_LANDING_KEY => option_env!("RESUME_DEFAULT_LANDING"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key source. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup(API_BASE_URL_KEY)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let default_landing = lookup(DEFAULT_LANDING_KEY)
            .map(|v| v.trim().to_owned())
            .filter(|v| v.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_LANDING.to_owned());

        Self {
            api_base_url,
            request_timeout_ms: parse_u64(lookup(REQUEST_TIMEOUT_KEY), DEFAULT_REQUEST_TIMEOUT_MS),
            restore_grace_ms: parse_u64(lookup(RESTORE_GRACE_KEY), DEFAULT_RESTORE_GRACE_MS),
            default_landing,
        }
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
