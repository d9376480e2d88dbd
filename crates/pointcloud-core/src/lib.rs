//! Core types for sparse feature-point capture.
//!
//! This crate is intentionally small. It knows nothing about the AR source
//! that produces points, nor about the on-disk log format: it only defines
//! the point value type and the deduplicating buffer points accumulate in
//! between flushes.

mod buffer;
mod logger;
mod point;

pub use buffer::PointBuffer;
pub use point::Point3D;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
