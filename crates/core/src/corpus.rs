//! Assembling the corpus: one [`InstanceStats`] per report on disk.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::categorize::{CategoryCache, Categorizer};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::model::{Corpus, InstanceStats, SampleEntry};
use crate::normalize::normalize;
use crate::parsers::{read_report, read_runtime};

/// Names of the instances with a report in `report_dir`, i.e. the file names
/// ending in `.{extension}` with that suffix removed, sorted.
pub fn discover_instances(report_dir: &Path, extension: &str) -> Result<Vec<String>> {
    let suffix = format!(".{extension}");
    let mut names = Vec::new();
    let dir = std::fs::read_dir(report_dir).map_err(|e| Error::io(report_dir, e))?;
    for entry in dir {
        let entry = entry.map_err(|e| Error::io(report_dir, e))?;
        // Follows symlinks, so linked reports count as instances.
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(&suffix)) else {
            continue;
        };
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Parse, filter and normalize one instance's report and resolve its runtime.
///
/// Categories are left at the uncategorized default. Read failures are logged
/// and the affected input treated as absent, so one bad instance never stops
/// the corpus.
pub fn load_instance(
    config: &EngineConfig,
    report_dir: &Path,
    log_dir: &Path,
    name: &str,
) -> InstanceStats {
    let report_path = report_dir.join(format!("{name}.{}", config.report_extension));
    let mut entries = read_report(&report_path, &config.module).unwrap_or_else(|e| {
        warn!(instance = name, "unreadable report: {e}");
        None
    });
    if let Some(entries) = entries.as_mut()
        && !normalize(entries)
    {
        debug!(instance = name, "report has no self time to normalize");
    }

    let log_path = log_dir.join(format!("{name}.{}", config.log_extension));
    let runtime_secs = read_runtime(&log_path, &config.runtime_prefix, config.timeout_secs)
        .unwrap_or_else(|e| {
            warn!(instance = name, "unreadable execution log: {e}");
            None
        });

    debug!(
        instance = name,
        entries = entries.as_ref().map(Vec::len),
        runtime_secs,
        "loaded instance"
    );
    InstanceStats {
        entries,
        runtime_secs,
    }
}

/// Stamp every entry with its category, consulting the table once per
/// distinct symbol.
pub fn categorize_entries<C: Categorizer + ?Sized>(
    entries: &mut [SampleEntry],
    cache: &mut CategoryCache<'_, C>,
) {
    for entry in entries {
        entry.category = cache.resolve(&entry.symbol).to_string();
    }
}

/// Build the full corpus from the reports in `report_dir` and the execution
/// logs in `log_dir`.
///
/// Instances load in parallel; the result is ordered by descending runtime
/// regardless of which finished first.
pub fn build_corpus<C: Categorizer + ?Sized>(
    config: &EngineConfig,
    report_dir: &Path,
    log_dir: &Path,
    categorizer: &C,
) -> Result<Corpus> {
    let names = discover_instances(report_dir, &config.report_extension)?;
    info!(instances = names.len(), dir = %report_dir.display(), "loading corpus");

    let mut loaded: Vec<(String, InstanceStats)> = names
        .into_par_iter()
        .map(|name| {
            let stats = load_instance(config, report_dir, log_dir, &name);
            (name, stats)
        })
        .collect();

    let mut cache = CategoryCache::new(categorizer);
    for (_, stats) in &mut loaded {
        if let Some(entries) = stats.entries.as_mut() {
            categorize_entries(entries, &mut cache);
        }
    }

    Ok(Corpus::new(loaded, config.timeout_secs))
}
