use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// I/O failures while moving a session log to or from disk.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to write session log to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read session log from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Write { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// Overwrite `path` with `contents` as UTF-8.
///
/// The write is done in place: a crash part-way through leaves a truncated
/// file. Use [`persist_atomic`] when that matters.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(contents), fields(bytes = contents.len()))
)]
pub fn persist(contents: &str, path: &Path) -> Result<(), ExportError> {
    fs::write(path, contents.as_bytes()).map_err(|e| ExportError::write(path, e))?;
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Write `contents` to a temporary file next to `path`, then rename it over `path`.
///
/// Readers see either the previous file or the complete new one.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(contents), fields(bytes = contents.len()))
)]
pub fn persist_atomic(contents: &str, path: &Path) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ExportError::write(path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ExportError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| ExportError::write(path, e.error))?;
    log::debug!("atomically wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Read a persisted log back from `path`.
pub fn verify(path: &Path) -> Result<String, ExportError> {
    fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionLog;
    use pointcloud_core::Point3D;

    fn sample_log() -> SessionLog {
        let mut log = SessionLog::new();
        log.append_batch(&[Point3D::new(0.123, -4.5, 6.0), Point3D::new(1.0, 2.0, 3.0)]);
        log.append_batch(&[Point3D::new(7.25, 0.0, -0.001)]);
        log
    }

    #[test]
    fn persist_then_verify_is_byte_identical() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("points.xyz");
        let log = sample_log();

        persist(log.as_str(), &path).expect("persist");
        let back = verify(&path).expect("verify");
        assert_eq!(back.as_bytes(), log.as_str().as_bytes());
    }

    #[test]
    fn persist_overwrites_instead_of_appending() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("points.xyz");

        persist("a much longer previous session log\n", &path).expect("first");
        persist("0\n\n", &path).expect("second");
        assert_eq!(verify(&path).expect("verify"), "0\n\n");
    }

    #[test]
    fn atomic_persist_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("points.xyz");
        let log = sample_log();

        persist("stale", &path).expect("seed");
        persist_atomic(log.as_str(), &path).expect("persist_atomic");
        assert_eq!(verify(&path).expect("verify"), log.as_str());

        let leftovers = std::fs::read_dir(dir.path()).expect("read_dir").count();
        assert_eq!(leftovers, 1, "temporary file should have been renamed");
    }

    #[test]
    fn write_into_missing_directory_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("points.xyz");

        let err = persist("1\n\n", &path).expect_err("should fail");
        assert!(matches!(err, ExportError::Write { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("points.xyz"));

        let err = persist_atomic("1\n\n", &path).expect_err("should fail");
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn verify_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = verify(&dir.path().join("nope.xyz")).expect_err("should fail");
        assert!(matches!(err, ExportError::Read { .. }));
    }
}
