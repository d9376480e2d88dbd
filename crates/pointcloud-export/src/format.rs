use std::fmt::Write as _;

use pointcloud_core::Point3D;

use crate::tag::TagCounter;

/// Factor applied to every coordinate on export.
pub const COORD_SCALE: f32 = 10.0;

/// Separator between the fields of a record line.
pub const FIELD_SEPARATOR: &str = "        ";

/// Render one batch block, advancing `counter` once per point.
///
/// Coordinates use the shortest `f32` representation that round-trips and
/// always carries a fractional part (`10.0`, `-0.0`, `-2.5`, `1.2345678`).
pub fn format_batch(points: &[Point3D], counter: &mut TagCounter) -> String {
    // "a" + 3 separators + ~3 numbers of up to a dozen chars
    let mut out = String::with_capacity(16 + points.len() * 64);
    let _ = write!(out, "{}\n\n", points.len());
    for p in points {
        let tag = counter.next_tag();
        let s = p.scaled(COORD_SCALE);
        let _ = writeln!(
            out,
            "{tag}{sep}{:?}{sep}{:?}{sep}{:?}",
            s.x,
            s.y,
            s.z,
            sep = FIELD_SEPARATOR
        );
    }
    out
}

/// Append-only text of every batch flushed during a session.
#[derive(Clone, Debug, Default)]
pub struct SessionLog {
    text: String,
    counter: TagCounter,
    batches: usize,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate already formatted text onto the log.
    ///
    /// The text is taken as is; it is not counted as a batch.
    pub fn append(&mut self, formatted: &str) {
        self.text.push_str(formatted);
    }

    /// Format `points` with this session's tag counter and append the block.
    pub fn append_batch(&mut self, points: &[Point3D]) {
        let block = format_batch(points, &mut self.counter);
        self.append(&block);
        self.batches += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn counter(&self) -> TagCounter {
        self.counter
    }

    /// Number of blocks added through [`append_batch`](Self::append_batch).
    pub fn batch_count(&self) -> usize {
        self.batches
    }
}
