//! Configuration module for environment variable parsing.
//!
//! Supplies defaults for the `mailtrack` binary. Command-line flags take
//! precedence over everything read here.

use std::env;
use tracing::warn;
use url::Url;

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tracking receiver base URL
    pub base_url: Option<String>,

    /// Default campaign identifier
    pub campaign_id: Option<String>,

    /// Default recipient identifier
    pub recipient_id: Option<String>,

    /// Whether to inject the unsubscribe footer
    pub unsubscribe_footer: bool,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            base_url: parse_non_empty("TRACKING_BASE_URL"),

            campaign_id: parse_non_empty("TRACKING_CAMPAIGN_ID"),

            recipient_id: parse_non_empty("TRACKING_RECIPIENT_ID"),

            unsubscribe_footer: parse_bool("TRACKING_UNSUBSCRIBE_FOOTER", true),

            log_format: parse_log_format("LOG_FORMAT"),
        }
    }
}

/// Whether `base_url` parses as an absolute http(s) URL.
///
/// Only used for warnings; the transforms accept any prefix.
pub fn is_absolute_http_url(base_url: &str) -> bool {
    Url::parse(base_url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Read a variable, treating an empty or whitespace-only value as unset.
fn parse_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag like "true", "0" or "off".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean value, using default");
            default
        }
    }
}

fn parse_log_format(name: &str) -> LogFormat {
    match env::var(name).map(|v| v.trim().to_lowercase()) {
        Err(_) => LogFormat::Json,
        Ok(v) if v == "json" => LogFormat::Json,
        Ok(v) if v == "pretty" => LogFormat::Pretty,
        Ok(v) => {
            warn!(env_var = name, value = %v, "Invalid log format, using json");
            LogFormat::Json
        }
    }
}
