//! JSON configuration for capture sessions.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Buffer size at which a capture window is flushed to the session log.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 8000;

/// Period of the sampling timer.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

#[derive(thiserror::Error, Debug)]
pub enum CaptureIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_output_path() -> PathBuf {
    PathBuf::from("points.xyz")
}

fn default_verify_after_persist() -> bool {
    true
}

/// Settings for a [`CaptureController`](crate::CaptureController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Flush once the buffer holds at least this many unique points.
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
    /// Period of the external sampling tick, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Where `stop()` writes the session log.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Write through a temporary file and rename instead of overwriting in place.
    #[serde(default)]
    pub atomic_persist: bool,
    /// Read the file back after writing it and log the contents at debug level.
    #[serde(default = "default_verify_after_persist")]
    pub verify_after_persist: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            flush_threshold: default_flush_threshold(),
            tick_interval_ms: default_tick_interval_ms(),
            output_path: default_output_path(),
            atomic_persist: false,
            verify_after_persist: default_verify_after_persist(),
        }
    }
}

impl CaptureConfig {
    /// Default settings writing to `output_path`.
    pub fn with_output_path(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CaptureIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CaptureIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg: CaptureConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg, CaptureConfig::default());
        assert_eq!(cfg.flush_threshold, 8000);
        assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
        assert_eq!(cfg.output_path, PathBuf::from("points.xyz"));
        assert!(!cfg.atomic_persist);
        assert!(cfg.verify_after_persist);
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let cfg: CaptureConfig =
            serde_json::from_str(r#"{"flush_threshold": 16, "atomic_persist": true}"#)
                .expect("parse");
        assert_eq!(cfg.flush_threshold, 16);
        assert!(cfg.atomic_persist);
        assert_eq!(cfg.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");
        let cfg = CaptureConfig {
            flush_threshold: 3,
            ..CaptureConfig::with_output_path(dir.path().join("out.xyz"))
        };
        cfg.write_json(&path).expect("write");
        assert_eq!(CaptureConfig::load_json(&path).expect("load"), cfg);
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.json");
        fs::write(&path, "{ not json").expect("seed");
        assert!(matches!(
            CaptureConfig::load_json(&path),
            Err(CaptureIoError::Json(_))
        ));
    }
}
