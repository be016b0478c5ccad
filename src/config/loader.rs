use std::path::PathBuf;

use tracing::debug;

use super::types::{
    Settings, default_cache_dir, default_page_size, default_trace_summary_threshold,
};
use crate::error::{BridgeError, Result};

const ENV_PUBLIC_KEY: &str = "LANGFUSE_PUBLIC_KEY";
const ENV_SECRET_KEY: &str = "LANGFUSE_SECRET_KEY";
const ENV_BASE_URL: &str = "LANGFUSE_BASEURL";
const ENV_CACHE_DIR: &str = "LANGFUSE_CACHE_DIR";
const ENV_PAGE_SIZE: &str = "LANGFUSE_PAGE_SIZE";
const ENV_SUMMARY_THRESHOLD: &str = "LANGFUSE_TRACE_SUMMARY_THRESHOLD";

/// Load settings from the environment.
///
/// # Errors
///
/// Returns an error if any of the three required variables
/// (`LANGFUSE_PUBLIC_KEY`, `LANGFUSE_SECRET_KEY`, `LANGFUSE_BASEURL`) is
/// missing or empty, or if an optional numeric override does not parse.
pub fn load_settings() -> Result<Settings> {
    let settings = Settings {
        public_key: required_env(ENV_PUBLIC_KEY)?,
        secret_key: required_env(ENV_SECRET_KEY)?,
        base_url: required_env(ENV_BASE_URL)?,
        cache_dir: std::env::var(ENV_CACHE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_cache_dir()),
        page_size: numeric_env(ENV_PAGE_SIZE)?.unwrap_or_else(default_page_size),
        trace_summary_threshold: numeric_env(ENV_SUMMARY_THRESHOLD)?
            .unwrap_or_else(default_trace_summary_threshold),
    };

    validate_settings(&settings)?;

    debug!(
        base_url = %settings.base_url,
        cache_dir = %settings.cache_dir.display(),
        page_size = settings.page_size,
        "Settings loaded"
    );

    Ok(settings)
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BridgeError::ConfigInvalid {
            field: name.to_string(),
            reason: "must be set and non-empty".to_string(),
        }),
    }
}

fn numeric_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            BridgeError::ConfigInvalid {
                field: name.to_string(),
                reason: format!("'{raw}' is not a valid number"),
            }
        }),
        Err(_) => Ok(None),
    }
}

/// Validate resolved settings.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://") {
        return Err(BridgeError::ConfigInvalid {
            field: ENV_BASE_URL.to_string(),
            reason: format!("'{}' is not an http(s) URL", settings.base_url),
        });
    }

    if settings.page_size == 0 {
        return Err(BridgeError::ConfigInvalid {
            field: ENV_PAGE_SIZE.to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }

    if settings.trace_summary_threshold == 0 {
        return Err(BridgeError::ConfigInvalid {
            field: ENV_SUMMARY_THRESHOLD.to_string(),
            reason: "threshold must be at least 1 byte".to_string(),
        });
    }

    Ok(())
}
