//! Facade over the `pointcloud-*` crates.
//!
//! Capture sparse 3-D feature points from an AR tracker, drop exact
//! duplicates, flush them in bounded batches to a tagged text log and write
//! the log to `points.xyz` when capture stops.
//!
//! ## Quickstart
//!
//! ```no_run
//! use pointcloud::{CaptureConfig, CaptureController, Point3D};
//!
//! let mut ctl = CaptureController::new(CaptureConfig::with_output_path("points.xyz"));
//! ctl.start();
//! ctl.tick(&[Point3D::new(0.1, 0.2, 0.3), Point3D::new(0.1, 0.2, 0.3)]);
//! let report = ctl.stop().expect("capture was running");
//! assert_eq!(report.final_batch_len, 1);
//! ```
//!
//! ## API map
//! - `pointcloud::core`: `Point3D`, `PointBuffer`, logger setup.
//! - `pointcloud::export`: tags, batch formatting, persist/verify, log parsing.
//! - `pointcloud::capture`: the capture state machine, config, point sources.
//! - `pointcloud::session`: replaying recordings and summarising logs.

pub use pointcloud_capture as capture;
pub use pointcloud_core as core;
pub use pointcloud_export as export;

pub use pointcloud_capture::{
    CaptureConfig, CaptureController, CaptureState, FrameRecording, PointSource, StopReport,
};
pub use pointcloud_core::{Point3D, PointBuffer};
pub use pointcloud_export::{SessionLog, Tag};

pub mod session;
