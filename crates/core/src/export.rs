//! JSON output of the analysis views.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{Error, Result};
use crate::partition::Analysis;

/// One of the nine JSON views an analysis produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatMode {
    CnfStats,
    TimedOutStats,
    CompletedStats,
    AggregateStats,
    AggregateTimedOutStats,
    AggregateCompletedStats,
    CategoryStats,
    CategoryTimedOutStats,
    CategoryCompletedStats,
}

impl StatMode {
    pub const ALL: [StatMode; 9] = [
        Self::CnfStats,
        Self::TimedOutStats,
        Self::CompletedStats,
        Self::AggregateStats,
        Self::AggregateTimedOutStats,
        Self::AggregateCompletedStats,
        Self::CategoryStats,
        Self::CategoryTimedOutStats,
        Self::CategoryCompletedStats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CnfStats => "cnf_stats",
            Self::TimedOutStats => "timed_out_stats",
            Self::CompletedStats => "completed_stats",
            Self::AggregateStats => "aggregate_stats",
            Self::AggregateTimedOutStats => "aggregate_timed_out_stats",
            Self::AggregateCompletedStats => "aggregate_completed_stats",
            Self::CategoryStats => "category_stats",
            Self::CategoryTimedOutStats => "category_timed_out_stats",
            Self::CategoryCompletedStats => "category_completed_stats",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for StatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatMode(pub String);

impl fmt::Display for UnknownStatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stat mode: {}", self.0)
    }
}

impl std::error::Error for UnknownStatMode {}

impl FromStr for StatMode {
    type Err = UnknownStatMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownStatMode(s.to_string()))
    }
}

impl Analysis {
    /// Pretty-print one view as JSON into `writer`.
    pub fn write_view<W: Write>(&self, mode: StatMode, writer: W) -> serde_json::Result<()> {
        match mode {
            StatMode::CnfStats => serde_json::to_writer_pretty(writer, &self.corpus),
            StatMode::TimedOutStats => {
                serde_json::to_writer_pretty(writer, &self.partitions.timed_out)
            }
            StatMode::CompletedStats => {
                serde_json::to_writer_pretty(writer, &self.partitions.completed)
            }
            StatMode::AggregateStats => serde_json::to_writer_pretty(writer, &self.full.functions),
            StatMode::AggregateTimedOutStats => {
                serde_json::to_writer_pretty(writer, &self.timed_out.functions)
            }
            StatMode::AggregateCompletedStats => {
                serde_json::to_writer_pretty(writer, &self.completed.functions)
            }
            StatMode::CategoryStats => serde_json::to_writer_pretty(writer, &self.full.categories),
            StatMode::CategoryTimedOutStats => {
                serde_json::to_writer_pretty(writer, &self.timed_out.categories)
            }
            StatMode::CategoryCompletedStats => {
                serde_json::to_writer_pretty(writer, &self.completed.categories)
            }
        }
    }

    /// Write one view to `path`, creating parent directories as needed.
    pub fn write_view_file(&self, mode: StatMode, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_view(mode, &mut writer)
            .map_err(|e| Error::json(path, e))?;
        writer.flush().map_err(|e| Error::io(path, e))
    }

    /// Write every view into `dir` as `<mode>.json`.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(StatMode::ALL.len());
        for mode in StatMode::ALL {
            let path = dir.join(mode.file_name());
            self.write_view_file(mode, &path)?;
            written.push(path);
        }
        info!(dir = %dir.display(), files = written.len(), "wrote analysis");
        Ok(written)
    }
}
