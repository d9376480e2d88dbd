//! `pointcloud` command-line tool.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use pointcloud::capture::CaptureIoError;
use pointcloud::session::{replay_recording, summarize_log, SessionError};
use pointcloud::{CaptureConfig, CaptureController, FrameRecording};

#[cfg(feature = "tracing")]
use pointcloud::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use pointcloud::core::init_with_level;

#[derive(Parser, Debug)]
#[command(name = "pointcloud", version, about = "Replay feature-point captures and inspect .xyz logs")]
struct Cli {
    /// Log verbosity.
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a recorded frame sequence through one capture window and save the log.
    Replay {
        /// Recording JSON: {"frames": [[[x, y, z], ...] | null, ...]}.
        #[arg(value_name = "RECORDING")]
        recording: PathBuf,
        /// Capture config JSON.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output log path (overrides the config).
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Flush threshold (overrides the config).
        #[arg(long, value_name = "N")]
        threshold: Option<usize>,
        /// Sleep one tick interval between frames.
        #[arg(long)]
        realtime: bool,
        /// Write the replay summary as JSON.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
    /// Read back an .xyz log and print batch and tag counts.
    Inspect {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: CaptureIoError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) {
    if let Err(e) = init_with_level(level.into()) {
        eprintln!("logger already installed: {e}");
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LogLevel) {
    init_tracing(false, level.into());
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Replay {
            recording,
            config,
            out,
            threshold,
            realtime,
            report,
        } => {
            let mut cfg = match config {
                Some(path) => load(&path, |p| CaptureConfig::load_json(p))?,
                None => CaptureConfig::default(),
            };
            if let Some(out) = out {
                cfg.output_path = out;
            }
            if let Some(threshold) = threshold {
                cfg.flush_threshold = threshold;
            }
            let frames = load(&recording, |p| FrameRecording::load_json(p))?;
            info!(
                "replaying {} frames ({} raw points) from {}",
                frames.len(),
                frames.point_count(),
                recording.display()
            );

            let pace = realtime.then(|| cfg.tick_interval());
            let mut ctl = CaptureController::new(cfg);
            let summary = replay_recording(&mut ctl, &frames, pace);

            if let Some(stop) = &summary.stop {
                match &stop.persist_error {
                    None => println!(
                        "wrote {} records in {} batches to {}",
                        stop.total_records,
                        stop.total_flushes,
                        stop.output_path.display()
                    ),
                    Some(msg) => warn!("session log not saved: {msg}"),
                }
            }
            println!(
                "frames: {} (skipped {}), raw points: {}, unique: {}",
                summary.frames, summary.skipped_frames, summary.raw_points, summary.unique_points
            );

            if let Some(path) = report {
                write_json(&path, &summary)?;
                println!("wrote report JSON to {}", path.display());
            }
            Ok(())
        }
        Command::Inspect { path } => {
            let summary = summarize_log(&path)?;
            println!("batches: {}", summary.batches);
            println!("records: {}", summary.records);
            for (tag, n) in &summary.per_tag {
                println!("  {tag}: {n}");
            }
            Ok(())
        }
    }
}

fn load<T>(
    path: &Path,
    loader: impl FnOnce(&Path) -> Result<T, CaptureIoError>,
) -> Result<T, CliError> {
    loader(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
