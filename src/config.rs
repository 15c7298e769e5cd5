//! Runtime configuration from `OSTEOSCAN_*` environment variables.
//!
//! Every setting has a default; a value that fails to parse falls back to the
//! default and leaves a note in [`AppConfig::warnings`]. Configuration is read
//! before the log subscriber exists, so the binary logs those notes once
//! tracing is up.

use std::time::Duration;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;

pub const DEFAULT_HISTORY_URL: &str = "http://localhost:8000";
pub const DEFAULT_HISTORY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_LOG_FILE: &str = "osteoscan.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal, stdout otherwise.
    #[default]
    Auto,
}

impl LogMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "stdout" => Some(Self::Stdout),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub history_base_url: String,
    pub history_enabled: bool,
    pub history_timeout: Duration,
    pub tick_interval: Duration,
    pub max_upload_bytes: u64,
    pub log_mode: LogMode,
    pub log_file: String,
    /// Per-line cap for the log sanitizer
    pub sanitize_max_bytes: usize,
    /// Values that were present but unusable.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_base_url: DEFAULT_HISTORY_URL.to_string(),
            history_enabled: true,
            history_timeout: Duration::from_millis(DEFAULT_HISTORY_TIMEOUT_MS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_mode: LogMode::Auto,
            log_file: DEFAULT_LOG_FILE.to_string(),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("OSTEOSCAN_HISTORY_URL") {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config.history_base_url = url.to_string();
            } else {
                config.warn("OSTEOSCAN_HISTORY_URL", url);
            }
        }

        if let Some(raw) = lookup("OSTEOSCAN_HISTORY_ENABLED") {
            match parse_bool(&raw) {
                Some(enabled) => config.history_enabled = enabled,
                None => config.warn("OSTEOSCAN_HISTORY_ENABLED", &raw),
            }
        }

        if let Some(ms) = config.positive_u64(&lookup, "OSTEOSCAN_HISTORY_TIMEOUT_MS") {
            config.history_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = config.positive_u64(&lookup, "OSTEOSCAN_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(bytes) = config.positive_u64(&lookup, "OSTEOSCAN_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }

        if let Some(bytes) = config.positive_u64(&lookup, "OSTEOSCAN_SANITIZE_MAX_BYTES") {
            config.sanitize_max_bytes = usize::try_from(bytes).unwrap_or(usize::MAX);
        }

        if let Some(raw) = lookup("OSTEOSCAN_LOG_MODE") {
            match LogMode::parse(&raw) {
                Some(mode) => config.log_mode = mode,
                None => config.warn("OSTEOSCAN_LOG_MODE", &raw),
            }
        }

        if let Some(path) = lookup("OSTEOSCAN_LOG_FILE") {
            if path.trim().is_empty() {
                config.warn("OSTEOSCAN_LOG_FILE", &path);
            } else {
                config.log_file = path;
            }
        }

        config
    }

    fn positive_u64(
        &mut self,
        lookup: &impl Fn(&str) -> Option<String>,
        key: &'static str,
    ) -> Option<u64> {
        let raw = lookup(key)?;
        match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => Some(v),
            _ => {
                self.warn(key, &raw);
                None
            }
        }
    }

    fn warn(&mut self, key: &str, raw: &str) {
        self.warnings
            .push(format!("Ignoring invalid {key}={raw:?}; using default"));
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.history_base_url, "http://localhost:8000");
        assert!(config.history_enabled);
        assert_eq!(config.history_timeout, Duration::from_millis(5_000));
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.log_file, "osteoscan.log");
        assert_eq!(config.sanitize_max_bytes, 16 * 1024);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OSTEOSCAN_HISTORY_URL", "https://records.example.org/api"),
            ("OSTEOSCAN_HISTORY_ENABLED", "no"),
            ("OSTEOSCAN_HISTORY_TIMEOUT_MS", "250"),
            ("OSTEOSCAN_TICK_MS", "20"),
            ("OSTEOSCAN_MAX_UPLOAD_BYTES", "1024"),
            ("OSTEOSCAN_LOG_MODE", "Stdout"),
            ("OSTEOSCAN_LOG_FILE", "/tmp/osteo.log"),
            ("OSTEOSCAN_SANITIZE_MAX_BYTES", "4096"),
        ]);

        assert_eq!(config.history_base_url, "https://records.example.org/api");
        assert!(!config.history_enabled);
        assert_eq!(config.history_timeout, Duration::from_millis(250));
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, "/tmp/osteo.log");
        assert_eq!(config.sanitize_max_bytes, 4096);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("OSTEOSCAN_HISTORY_URL", "localhost:8000"),
            ("OSTEOSCAN_TICK_MS", "0"),
            ("OSTEOSCAN_HISTORY_TIMEOUT_MS", "soon"),
            ("OSTEOSCAN_LOG_MODE", "syslog"),
            ("OSTEOSCAN_SANITIZE_MAX_BYTES", "-1"),
        ]);

        assert_eq!(config.history_base_url, DEFAULT_HISTORY_URL);
        assert_eq!(config.tick_interval, Duration::from_millis(DEFAULT_TICK_MS));
        assert_eq!(
            config.history_timeout,
            Duration::from_millis(DEFAULT_HISTORY_TIMEOUT_MS)
        );
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(config.warnings.len(), 5);
        assert!(config.warnings.iter().any(|w| w.contains("OSTEOSCAN_TICK_MS")));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
    }
}
