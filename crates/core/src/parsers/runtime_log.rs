use std::path::Path;

use tracing::warn;

use super::read_lossy;
use crate::error::Result;

/// Find the runtime recorded in an execution log.
///
/// The first line starting with `prefix` whose remainder parses as seconds
/// (an optional trailing `s` is stripped) to a finite, non-negative number
/// wins. A log without such a line belongs to an instance that never
/// finished, so it resolves to `timeout_secs`.
pub fn parse_runtime(text: &str, prefix: &str, timeout_secs: f64) -> f64 {
    for line in text.lines() {
        let Some(rest) = line.strip_prefix(prefix) else {
            continue;
        };
        let value = rest.trim().trim_end_matches('s').trim_end();
        match value.parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => return secs,
            Ok(secs) => warn!(line = %line, secs, "ignoring out-of-range runtime"),
            Err(e) => warn!(line = %line, "ignoring unparseable runtime line: {e}"),
        }
    }
    timeout_secs
}

/// Resolve the runtime of the instance whose execution log is at `path`.
///
/// `Ok(None)` means the log does not exist, which is reported separately
/// from a log that exists but lacks the completion marker.
pub fn read_runtime(path: &Path, prefix: &str, timeout_secs: f64) -> Result<Option<f64>> {
    Ok(read_lossy(path)?.map(|text| parse_runtime(&text, prefix, timeout_secs)))
}
