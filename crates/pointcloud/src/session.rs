//! End-to-end helpers: replay a recorded session, summarise a written log.

use std::collections::BTreeMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use pointcloud_capture::{CaptureController, FrameRecording, StopReport};
use pointcloud_export::{parse_log, verify, ExportError, ParseError, Tag};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while summarising a persisted log.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Counters collected while replaying a recording.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub frames: usize,
    /// Ticks skipped because the recording had no frame.
    pub skipped_frames: usize,
    pub raw_points: usize,
    /// Points that survived deduplication.
    pub unique_points: usize,
    /// Flushes triggered by the size threshold (the final one excluded).
    pub threshold_flushes: usize,
    pub stop: Option<StopReport>,
}

/// Drive one capture window over `recording`: start, one sample per frame, stop.
///
/// With `pace`, sleeps that long between ticks to mimic the live timer.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(ctl, recording), fields(frames = recording.len()))
)]
pub fn replay_recording(
    ctl: &mut CaptureController,
    recording: &FrameRecording,
    pace: Option<Duration>,
) -> ReplaySummary {
    let mut summary = ReplaySummary {
        frames: recording.len(),
        raw_points: recording.point_count(),
        ..ReplaySummary::default()
    };

    ctl.start();
    let mut source = recording.replay();
    for i in 0..recording.len() {
        if let (Some(pace), true) = (pace, i > 0) {
            thread::sleep(pace);
        }
        match ctl.sample(&mut source) {
            Some(outcome) => {
                summary.unique_points += outcome.added;
                summary.threshold_flushes += usize::from(outcome.flushed.is_some());
            }
            None => summary.skipped_frames += 1,
        }
    }
    summary.stop = ctl.stop();
    summary
}

/// Batch and record counts of a persisted log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub batches: usize,
    pub records: usize,
    pub batch_sizes: Vec<usize>,
    pub per_tag: BTreeMap<Tag, usize>,
}

/// Read back `path` and tally its contents.
pub fn summarize_log(path: &Path) -> Result<LogSummary, SessionError> {
    let text = verify(path)?;
    let batches = parse_log(&text)?;

    let mut summary = LogSummary {
        batches: batches.len(),
        batch_sizes: batches.iter().map(|b| b.len()).collect(),
        ..LogSummary::default()
    };
    for record in batches.iter().flat_map(|b| &b.records) {
        summary.records += 1;
        *summary.per_tag.entry(record.tag).or_default() += 1;
    }
    Ok(summary)
}
