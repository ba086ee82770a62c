//! Readers for the two per-instance inputs: the profiler report and the
//! execution log.

pub mod perf_report;
pub mod runtime_log;

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

pub use perf_report::{parse_report, read_report};
pub use runtime_log::{parse_runtime, read_runtime};

/// Read a text file, treating a missing file as `None` and invalid UTF-8 as
/// replacement characters. Report symbols are ASCII in practice, so a stray
/// byte only ever spoils the line it sits on.
fn read_lossy(path: &Path) -> Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}
