//! Feature-point capture driven by an external tick.
//!
//! A [`CaptureController`] is poked from a single thread of control:
//! - `start()` / `stop()` from the input layer (touch down / touch up),
//! - `tick(points)` or `sample(source)` from a periodic timer.
//!
//! While capturing, points are deduplicated into a buffer that is flushed
//! to the session log every [`DEFAULT_FLUSH_THRESHOLD`] points. `stop()`
//! flushes the remainder and writes the whole log to disk.

mod config;
mod controller;
mod source;

pub use config::{CaptureConfig, CaptureIoError, DEFAULT_FLUSH_THRESHOLD, DEFAULT_TICK_INTERVAL_MS};
pub use controller::{CaptureController, CaptureState, StopReport, TickOutcome};
pub use source::{FrameRecording, PointSource, ReplaySource};
