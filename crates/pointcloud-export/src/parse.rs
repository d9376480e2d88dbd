use pointcloud_core::Point3D;
use serde::{Deserialize, Serialize};

use crate::format::{COORD_SCALE, FIELD_SEPARATOR};
use crate::tag::Tag;

/// One record line, with coordinates as written (already scaled).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub tag: Tag,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ExportRecord {
    /// The captured point, with the export scale undone.
    pub fn point(&self) -> Point3D {
        Point3D::new(self.x, self.y, self.z).scaled(1.0 / COORD_SCALE)
    }
}

/// One flush block read back from a log.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBatch {
    pub records: Vec<ExportRecord>,
}

impl ParsedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Malformed session log. Line numbers are 1-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected a record count, got {value:?}")]
    InvalidCount { line: usize, value: String },
    #[error("line {line}: expected an empty line after the record count")]
    MissingBlankLine { line: usize },
    #[error("line {line}: batch ended after {found} of {expected} records")]
    Truncated {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Parse a session log into its flush blocks.
pub fn parse_log(text: &str) -> Result<Vec<ParsedBatch>, ParseError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut batches = Vec::new();

    while let Some((line, header)) = lines.next() {
        let expected: usize = header
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidCount {
                line,
                value: header.to_string(),
            })?;

        match lines.next() {
            Some((_, blank)) if blank.trim().is_empty() => {}
            Some((line, _)) => return Err(ParseError::MissingBlankLine { line }),
            None => return Err(ParseError::MissingBlankLine { line: line + 1 }),
        }

        let mut records = Vec::with_capacity(expected);
        let mut last_line = line + 1;
        for found in 0..expected {
            let Some((line, raw)) = lines.next() else {
                return Err(ParseError::Truncated {
                    line: last_line + 1,
                    expected,
                    found,
                });
            };
            records.push(parse_record(line, raw)?);
            last_line = line;
        }
        batches.push(ParsedBatch { records });
    }

    Ok(batches)
}

fn parse_record(line: usize, raw: &str) -> Result<ExportRecord, ParseError> {
    let invalid = |reason: String| ParseError::InvalidRecord { line, reason };

    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    let [tag, x, y, z] = fields.as_slice() else {
        return Err(invalid(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };

    let tag: Tag = tag.parse().map_err(|e| invalid(format!("{e}")))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f32>()
            .map_err(|_| invalid(format!("invalid coordinate {s:?}")))
    };

    Ok(ExportRecord {
        tag,
        x: coord(*x)?,
        y: coord(*y)?,
        z: coord(*z)?,
    })
}
