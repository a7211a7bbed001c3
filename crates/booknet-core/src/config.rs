//! Environment-variable helpers used by each service's `Config::from_env`.

use std::str::FromStr;

use anyhow::{Context as _, anyhow};

/// Read a required variable. Empty values count as missing.
pub fn env_required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(anyhow!("environment variable {name} is empty")),
        Err(_) => Err(anyhow!("environment variable {name} is not set")),
    }
}

/// Read an optional variable and parse it, falling back to `default` when unset.
///
/// A value that is present but does not parse is an error rather than a silent default.
pub fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
