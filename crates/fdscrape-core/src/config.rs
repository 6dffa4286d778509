use crate::app_config::{AppConfig, DEFAULT_START_URL, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults reproduce the behaviour of a plain
/// `fdscrape walk` against the FramesDirect eyeglasses listing.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let start_url = or_default("FDSCRAPE_START_URL", DEFAULT_START_URL);
    if !(start_url.starts_with("http://")
        || start_url.starts_with("https://")
        || start_url.starts_with("file://"))
    {
        return Err(invalid(
            "FDSCRAPE_START_URL",
            format!("\"{start_url}\" is not an http(s) or file URL"),
        ));
    }

    let log_level = or_default("FDSCRAPE_LOG_LEVEL", "info");
    let rules_path = optional("FDSCRAPE_RULES_PATH").map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("FDSCRAPE_OUTPUT_DIR", "."));
    let output_stem = or_default("FDSCRAPE_OUTPUT_STEM", "framesdirect_data");
    if output_stem.trim().is_empty() {
        return Err(invalid("FDSCRAPE_OUTPUT_STEM", "must be non-empty".to_string()));
    }

    let wait_timeout_secs = parse_u64("FDSCRAPE_WAIT_TIMEOUT_SECS", "20")?;
    let scroll_passes = parse_u32("FDSCRAPE_SCROLL_PASSES", "2")?;
    let scroll_pause_ms = parse_u64("FDSCRAPE_SCROLL_PAUSE_MS", "1000")?;
    let click_pause_ms = parse_u64("FDSCRAPE_CLICK_PAUSE_MS", "300")?;
    let user_agent = or_default("FDSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);
    let chrome_path = optional("FDSCRAPE_CHROME_PATH").map(PathBuf::from);

    let headless = parse_bool(&or_default("FDSCRAPE_HEADLESS", "true"))
        .ok_or_else(|| invalid("FDSCRAPE_HEADLESS", "expected true or false".to_string()))?;

    let max_pages = match optional("FDSCRAPE_MAX_PAGES") {
        None => None,
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) => return Err(invalid("FDSCRAPE_MAX_PAGES", "must be at least 1".to_string())),
            Ok(n) => Some(n),
            Err(e) => return Err(invalid("FDSCRAPE_MAX_PAGES", e.to_string())),
        },
    };

    Ok(AppConfig {
        start_url,
        log_level,
        rules_path,
        output_dir,
        output_stem,
        wait_timeout_secs,
        scroll_passes,
        scroll_pause_ms,
        click_pause_ms,
        user_agent,
        chrome_path,
        headless,
        max_pages,
    })
}

/// Accepts the usual spellings of a boolean flag.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
