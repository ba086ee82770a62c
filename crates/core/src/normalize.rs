use crate::model::SampleEntry;

/// Sum of raw self percentages across one instance's entries.
pub fn total_self_pct(entries: &[SampleEntry]) -> f64 {
    entries.iter().map(|e| e.self_pct).sum()
}

/// Rescale `self_pct` into `norm_self_pct` so the entries sum to 1.0.
///
/// Filtering drops part of the original 100%, so the raw percentages of the
/// retained entries rarely add up to anything meaningful on their own.
/// Returns `false` and leaves every `norm_self_pct` at zero when the entries
/// carry no self time at all.
pub fn normalize(entries: &mut [SampleEntry]) -> bool {
    let total = total_self_pct(entries);
    if total == 0.0 {
        for entry in entries.iter_mut() {
            entry.norm_self_pct = 0.0;
        }
        return false;
    }
    for entry in entries.iter_mut() {
        entry.norm_self_pct = entry.self_pct / total;
    }
    true
}
