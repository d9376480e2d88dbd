use std::{fs, path::Path};

use pointcloud_core::Point3D;
use serde::{Deserialize, Serialize};

use crate::config::CaptureIoError;

/// Supplier of the current frame's raw feature points.
///
/// This is the seam to the AR tracking session. `None` means no frame is
/// available right now and the tick should be skipped; an empty `Vec` is a
/// frame without any feature points.
pub trait PointSource {
    fn current_points(&mut self) -> Option<Vec<Point3D>>;
}

impl<F> PointSource for F
where
    F: FnMut() -> Option<Vec<Point3D>>,
{
    fn current_points(&mut self) -> Option<Vec<Point3D>> {
        self()
    }
}

/// Recorded sequence of per-tick point sets.
///
/// Stored as JSON: `{"frames": [[[x, y, z], ...], null, ...]}`, where `null`
/// marks a tick at which the tracker had no frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecording {
    pub frames: Vec<Option<Vec<Point3D>>>,
}

impl FrameRecording {
    pub fn new(frames: Vec<Option<Vec<Point3D>>>) -> Self {
        Self { frames }
    }

    /// Load a recording from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CaptureIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this recording to disk as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CaptureIoError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total number of raw points across all available frames.
    pub fn point_count(&self) -> usize {
        self.frames.iter().flatten().map(Vec::len).sum()
    }

    /// A source that plays the frames back in order.
    pub fn replay(&self) -> ReplaySource<'_> {
        ReplaySource {
            frames: self.frames.iter(),
        }
    }
}

/// [`PointSource`] over a [`FrameRecording`]; yields `None` once exhausted.
#[derive(Debug, Clone)]
pub struct ReplaySource<'a> {
    frames: std::slice::Iter<'a, Option<Vec<Point3D>>>,
}

impl ReplaySource<'_> {
    /// Frames not yet played.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PointSource for ReplaySource<'_> {
    fn current_points(&mut self) -> Option<Vec<Point3D>> {
        self.frames.next().cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> FrameRecording {
        FrameRecording::new(vec![
            Some(vec![Point3D::new(1.0, 2.0, 3.0)]),
            None,
            Some(Vec::new()),
            Some(vec![Point3D::new(0.0, 0.0, 1.0), Point3D::new(0.5, 0.5, 0.5)]),
        ])
    }

    #[test]
    fn replay_yields_frames_in_order_then_none() {
        let rec = recording();
        let mut src = rec.replay();
        assert_eq!(src.remaining(), 4);
        assert_eq!(src.current_points(), Some(vec![Point3D::new(1.0, 2.0, 3.0)]));
        assert_eq!(src.current_points(), None);
        assert_eq!(src.current_points(), Some(Vec::new()));
        assert_eq!(src.current_points().map(|f| f.len()), Some(2));
        assert_eq!(src.remaining(), 0);
        assert_eq!(src.current_points(), None);
    }

    #[test]
    fn parses_json_with_missing_frames() {
        let rec: FrameRecording =
            serde_json::from_str(r#"{"frames": [[[1.0, 2.0, 3.0]], null, []]}"#).expect("parse");
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.frames[1], None);
        assert_eq!(rec.point_count(), 1);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frames.json");
        let rec = recording();
        rec.write_json(&path).expect("write");
        assert_eq!(FrameRecording::load_json(&path).expect("load"), rec);
    }

    #[test]
    fn closures_are_point_sources() {
        let mut calls = 0;
        let mut src = || {
            calls += 1;
            Some(vec![Point3D::new(calls as f32, 0.0, 0.0)])
        };
        assert_eq!(src.current_points(), Some(vec![Point3D::new(1.0, 0.0, 0.0)]));
        assert_eq!(src.current_points(), Some(vec![Point3D::new(2.0, 0.0, 0.0)]));
    }
}
