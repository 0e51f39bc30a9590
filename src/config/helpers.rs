//! Small helpers for reading configuration from the environment.

use std::str::FromStr;

use crate::error::ConfigError;

/// Read an optional environment variable. Empty values count as unset.
pub fn optional_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if v.trim().is_empty() => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Read an optional environment variable and parse it, falling back to a
/// default when unset. A present-but-unparseable value is a hard error so
/// typos don't silently pick the default.
pub fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}
