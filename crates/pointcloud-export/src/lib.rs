//! Text export for captured feature points.
//!
//! A session log is a sequence of blocks, one per flush:
//!
//! ```text
//! <N>
//!
//! <tag>        <x*10>        <y*10>        <z*10>
//! ... (N record lines)
//! ```
//!
//! Tags cycle through `a..g` with a counter that spans the whole session.
//! Coordinates are multiplied by [`COORD_SCALE`] before they are written.
//!
//! - [`format_batch`] renders one block and advances a [`TagCounter`].
//! - [`SessionLog`] accumulates blocks and owns the session's counter.
//! - [`persist`] / [`persist_atomic`] / [`verify`] move the log to and from disk.
//! - [`parse_log`] reads a log back into records for inspection.

mod format;
mod parse;
mod persist;
mod tag;

pub use format::{format_batch, SessionLog, COORD_SCALE, FIELD_SEPARATOR};
pub use parse::{parse_log, ExportRecord, ParseError, ParsedBatch};
pub use persist::{persist, persist_atomic, verify, ExportError};
pub use tag::{Tag, TagCounter, UnknownTag};
