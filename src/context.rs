use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;

use crate::errors::CovbenchError;
use crate::parse;
use crate::types::Measurement;

/// Explicit log sink for one benchmark invocation.
///
/// Owns the append-only log file every component writes through; there is no
/// ambient logger. The log is the sole persistence between the sweep phase
/// and the reporting phase.
pub struct RunContext {
    log_path: PathBuf,
    sink: File,
}

impl RunContext {
    /// Create `<log_dir>/<timestamp>.log` (one fresh file per invocation)
    /// and announce its path on stderr.
    pub fn create(log_dir: &Path) -> Result<RunContext, CovbenchError> {
        fs::create_dir_all(log_dir).map_err(|source| CovbenchError::LogWrite {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let name = format!("{}.log", Local::now().format("%Y-%m-%dT%H-%M-%S"));
        let log_path = log_dir.join(name);
        let sink = File::create(&log_path).map_err(|source| CovbenchError::LogWrite {
            path: log_path.clone(),
            source,
        })?;

        eprintln!("See log file: {}", log_path.display());
        Ok(RunContext { log_path, sink })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Free-form diagnostic line. Best-effort: a failed diagnostic write
    /// never aborts a sweep.
    pub fn info(&mut self, msg: &str) {
        let _ = writeln!(self.sink, "[INFO] {msg}");
    }

    /// Diagnostic line, mirrored to stderr.
    pub fn warn(&mut self, msg: &str) {
        eprintln!("warning: {msg}");
        let _ = writeln!(self.sink, "[WARN] {msg}");
    }

    /// Append one measurement tag line. Unlike diagnostics, a failed
    /// measurement write propagates: the log is the only copy of results.
    pub fn record(&mut self, m: &Measurement) -> Result<(), CovbenchError> {
        writeln!(self.sink, "{}", parse::measurement_line(m)).map_err(|source| {
            CovbenchError::LogWrite {
                path: self.log_path.clone(),
                source,
            }
        })?;
        self.sink.flush().map_err(|source| CovbenchError::LogWrite {
            path: self.log_path.clone(),
            source,
        })
    }
}

/// Most recent `*.log` file in the log directory, by mtime descending.
/// Reporting without an explicit `--log` goes through this.
pub fn latest_log(log_dir: &Path) -> Result<PathBuf, CovbenchError> {
    if !log_dir.is_dir() {
        return Err(CovbenchError::LogDirNotFound {
            path: log_dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(log_dir).map_err(|source| CovbenchError::LogRead {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        let metadata = match path.symlink_metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        if !metadata.is_file() {
            continue;
        }

        let mtime = match metadata.modified() {
            Ok(t) => t,
            Err(_) => continue,
        };

        candidates.push((mtime, path));
    }

    // Timestamped names break mtime ties from same-second invocations.
    candidates.sort_by(|a, b| b.cmp(a));

    candidates
        .into_iter()
        .next()
        .map(|(_, path)| path)
        .ok_or(CovbenchError::NoLogsFound {
            path: log_dir.to_path_buf(),
        })
}
