use std::path::PathBuf;

use log::{debug, error, info, warn};
use pointcloud_core::{Point3D, PointBuffer};
use pointcloud_export::{persist, persist_atomic, verify, ExportError, SessionLog};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::CaptureConfig;
use crate::source::PointSource;

/// Whether ticks are currently collecting points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points that were not already in the buffer.
    pub added: usize,
    /// Size of the batch flushed by this tick, if the threshold was reached.
    pub flushed: Option<usize>,
}

/// Summary of a finished capture window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopReport {
    /// Points in the forced final flush.
    pub final_batch_len: usize,
    /// Flushes performed since the controller was created.
    pub total_flushes: usize,
    /// Records in the session log so far.
    pub total_records: u64,
    pub log_bytes: usize,
    pub output_path: PathBuf,
    /// Persist failure message; `None` if the file was written.
    #[serde(default)]
    pub persist_error: Option<String>,
}

impl StopReport {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Two-state capture loop: dedup into a buffer, flush by size, persist on stop.
///
/// The session log and its tag counter outlive individual capture windows.
/// Every `stop()` rewrites the output file with everything captured since
/// the controller was created.
#[derive(Debug)]
pub struct CaptureController {
    config: CaptureConfig,
    state: CaptureState,
    buffer: PointBuffer,
    log: SessionLog,
    flushes: usize,
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

impl CaptureController {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            buffer: PointBuffer::with_capacity(config.flush_threshold.clamp(1, 1 << 16)),
            config,
            state: CaptureState::Idle,
            log: SessionLog::new(),
            flushes: 0,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    pub fn buffer(&self) -> &PointBuffer {
        &self.buffer
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    /// Flushes performed since creation, forced ones included.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Begin a capture window. No-op while already capturing.
    pub fn start(&mut self) {
        if self.is_capturing() {
            return;
        }
        self.state = CaptureState::Capturing;
        info!("capture started");
    }

    /// End the capture window: flush the remainder and persist the log.
    ///
    /// Returns `None` if the controller was idle. A failed write is logged
    /// and recorded in the report; the controller stays usable and the next
    /// `stop()` writes the accumulated log again.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub fn stop(&mut self) -> Option<StopReport> {
        if !self.is_capturing() {
            return None;
        }
        self.state = CaptureState::Idle;

        let final_batch_len = self.flush();
        let persist_error = self.persist().err().map(|e| {
            error!("{e}");
            e.to_string()
        });

        let report = StopReport {
            final_batch_len,
            total_flushes: self.flushes,
            total_records: self.log.counter().emitted(),
            log_bytes: self.log.as_str().len(),
            output_path: self.config.output_path.clone(),
            persist_error,
        };
        info!(
            "capture stopped: {} flushes, {} records, {} bytes",
            report.total_flushes, report.total_records, report.log_bytes
        );
        Some(report)
    }

    /// Merge one tick's points into the buffer. No-op while idle.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, points), fields(n = points.len()))
    )]
    pub fn tick(&mut self, points: &[Point3D]) -> TickOutcome {
        if !self.is_capturing() {
            return TickOutcome::default();
        }

        let added = self.buffer.extend_unique(points.iter().copied());
        let flushed = (self.buffer.count() >= self.threshold()).then(|| self.flush());
        debug!(
            "tick: {} raw, {} new, buffer {}",
            points.len(),
            added,
            self.buffer.count()
        );
        TickOutcome { added, flushed }
    }

    /// Pull the current frame from `source` and [`tick`](Self::tick) with it.
    ///
    /// The source is not queried while idle. Returns `None` when the tick
    /// was skipped, either because capture is off or no frame was available.
    pub fn sample<S: PointSource + ?Sized>(&mut self, source: &mut S) -> Option<TickOutcome> {
        if !self.is_capturing() {
            return None;
        }
        let Some(points) = source.current_points() else {
            debug!("no frame available, skipping tick");
            return None;
        };
        Some(self.tick(&points))
    }

    fn threshold(&self) -> usize {
        self.config.flush_threshold.max(1)
    }

    fn flush(&mut self) -> usize {
        let n = self.buffer.count();
        self.log.append_batch(self.buffer.snapshot());
        self.buffer.clear();
        self.flushes += 1;
        debug!("flushed batch {} with {} points", self.flushes, n);
        n
    }

    fn persist(&self) -> Result<(), ExportError> {
        let path = &self.config.output_path;
        if self.config.atomic_persist {
            persist_atomic(self.log.as_str(), path)?;
        } else {
            persist(self.log.as_str(), path)?;
        }
        info!("saved session log to {}", path.display());

        if self.config.verify_after_persist {
            match verify(path) {
                Ok(text) => debug!("read back {} bytes:\n{}", text.len(), text),
                Err(e) => warn!("{e}"),
            }
        }
        Ok(())
    }
}
