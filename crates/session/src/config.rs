//! Session configuration, read from the environment.

use std::path::PathBuf;

use reorder_observability::LogFormat;

pub const EXPORT_DIR_VAR: &str = "REORDER_EXPORT_DIR";
pub const LOG_FORMAT_VAR: &str = "REORDER_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory exports and the template are written to.
    pub export_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            log_format: LogFormat::default(),
        }
    }
}

impl SessionConfig {
    /// Build from `REORDER_EXPORT_DIR` / `REORDER_LOG_FORMAT`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(EXPORT_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(err) => tracing::warn!(%err, "{LOG_FORMAT_VAR} invalid; using json"),
            }
        }

        config
    }

    /// Install the process-wide tracing subscriber in the configured format.
    pub fn init_tracing(&self) {
        reorder_observability::init_with(self.log_format);
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = SessionConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_both_variables() {
        let config = SessionConfig::from_lookup(lookup(&[
            (EXPORT_DIR_VAR, "/tmp/exports"),
            (LOG_FORMAT_VAR, "pretty"),
        ]));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = SessionConfig::from_lookup(lookup(&[
            (EXPORT_DIR_VAR, "   "),
            (LOG_FORMAT_VAR, "yaml"),
        ]));
        assert_eq!(config, SessionConfig::default());
    }
}
