// Chunk: docs/chunks/refresh_scheduling - Engine tuning loaded from JSON

//! Engine tuning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::DEFAULT_MAX_DISPATCH_DEPTH;
use crate::error::ConfigError;
use crate::refresh_queue::DEFAULT_LINES_PER_FRAME;
use crate::throttle::DEFAULT_MIN_REFRESH_INTERVAL_MS;

/// Tuning knobs of a [`LabeledDocument`](crate::LabeledDocument).
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "lines_per_frame": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelerConfig {
    /// Minimum time between full relabels of one line, in milliseconds.
    pub min_refresh_interval_ms: u64,
    /// Lines relabeled per host frame.
    pub lines_per_frame: usize,
    /// Deepest sub-scheme nesting the dispatcher descends into.
    pub max_dispatch_depth: usize,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            min_refresh_interval_ms: DEFAULT_MIN_REFRESH_INTERVAL_MS,
            lines_per_frame: DEFAULT_LINES_PER_FRAME,
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}

impl LabelerConfig {
    pub fn min_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.min_refresh_interval_ms)
    }

    /// Lines per frame, never zero.
    pub fn frame_budget(&self) -> usize {
        self.lines_per_frame.max(1)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LabelerConfig::default();
        assert_eq!(config.min_refresh_interval(), Duration::from_millis(500));
        assert_eq!(config.lines_per_frame, 20);
        assert_eq!(config.max_dispatch_depth, 8);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LabelerConfig::from_json(r#"{ "lines_per_frame": 50 }"#).unwrap();
        assert_eq!(config.lines_per_frame, 50);
        assert_eq!(config.min_refresh_interval_ms, 500);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = LabelerConfig::from_json(r#"{ "lines_per_second": 5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_zero_budget_still_makes_progress() {
        let config = LabelerConfig {
            lines_per_frame: 0,
            ..LabelerConfig::default()
        };
        assert_eq!(config.frame_budget(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_dispatch_depth": 3 }}"#).unwrap();
        let config = LabelerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_dispatch_depth, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LabelerConfig::load(Path::new("/nonexistent/linelabel.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
