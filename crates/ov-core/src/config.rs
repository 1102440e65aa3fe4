//! Environment Configuration Loader
//!
//! Loads environment variables from `/etc/oview/environment` (or a
//! development `.env`) so the CLI and any embedding host read the same
//! settings.
//!
//! ```rust
//! use ov_core::config::load_environment;
//!
//! load_environment();
//! let output = ov_core::config::get_config("OV_OUTPUT", "text");
//! ```

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Paths checked in order of priority
pub const ENV_FILE_PATHS: &[&str] = &["/etc/oview/environment", "/etc/oview.env", ".env"];

/// Output format for display models (`json` or `text`)
pub const OUTPUT_KEY: &str = "OV_OUTPUT";

/// Worker count for batch inspection
pub const WORKERS_KEY: &str = "OV_WORKERS";

/// Load environment variables from the first environment file found.
///
/// `OV_ENV_FILE` takes precedence over the standard paths. Variables that
/// are already set are never overridden.
///
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("OV_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded_path) = try_load_env_file(path) {
            return Some(loaded_path);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &str) -> Option<String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return None;
    }

    match fs::read_to_string(path_obj) {
        Ok(content) => {
            let mut loaded_count = 0;
            let mut skipped_count = 0;

            for (key, value) in content.lines().filter_map(parse_env_line) {
                if std::env::var(&key).is_err() {
                    std::env::set_var(&key, &value);
                    loaded_count += 1;
                    debug!("Loaded: {}={}", key, value);
                } else {
                    skipped_count += 1;
                    debug!("Skipped (already set): {}", key);
                }
            }

            info!(
                "Loaded {} environment variables from {} ({} skipped - already set)",
                loaded_count, path, skipped_count
            );

            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

/// Parse a single `KEY=VALUE` line. Comments and blank lines yield None.
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Get a configuration value with a default.
pub fn get_config(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an integer configuration value.
pub fn get_config_int(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
