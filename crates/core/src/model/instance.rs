use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::SampleEntry;

/// Everything known about one profiled instance.
///
/// `entries` is `None` when the instance had no profiler report at all, which
/// is distinct from a report that parsed to zero retained lines. `runtime_secs`
/// is `None` when the execution log could not be found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceStats {
    #[serde(rename = "stats")]
    pub entries: Option<Vec<SampleEntry>>,
    #[serde(rename = "time")]
    pub runtime_secs: Option<f64>,
}

impl InstanceStats {
    /// Runtime this instance contributes to aggregate totals, if any.
    ///
    /// Instances without a report, without a log, or with a zero runtime
    /// cannot be time-weighted and contribute nothing.
    pub fn weighted_runtime(&self) -> Option<f64> {
        self.entries.as_ref()?;
        self.runtime_secs.filter(|t| *t != 0.0)
    }

    /// Runtime used for ordering the corpus listing only.
    pub fn ordering_runtime(&self, timeout_secs: f64) -> f64 {
        self.runtime_secs
            .filter(|t| *t != 0.0)
            .unwrap_or(timeout_secs)
    }

    pub fn entries(&self) -> &[SampleEntry] {
        self.entries.as_deref().unwrap_or_default()
    }
}

/// The instances of one invocation, keyed by name and ordered by descending
/// runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    instances: IndexMap<String, InstanceStats>,
}

impl Corpus {
    /// Order `instances` by descending runtime, substituting `timeout_secs`
    /// for missing or zero runtimes. Equal runtimes fall back to name order so
    /// the listing never depends on input order.
    pub fn new(
        instances: impl IntoIterator<Item = (String, InstanceStats)>,
        timeout_secs: f64,
    ) -> Self {
        let mut instances: IndexMap<String, InstanceStats> = instances.into_iter().collect();
        instances.sort_by(|a_name, a, b_name, b| {
            b.ordering_runtime(timeout_secs)
                .total_cmp(&a.ordering_runtime(timeout_secs))
                .then_with(|| a_name.cmp(b_name))
        });
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&InstanceStats> {
        self.instances.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceStats)> {
        self.instances.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    /// Sub-corpus of the instances matching `keep`, in the same order.
    pub fn filter(&self, mut keep: impl FnMut(&InstanceStats) -> bool) -> Self {
        Self {
            instances: self
                .instances
                .iter()
                .filter(|(_, stats)| keep(stats))
                .map(|(name, stats)| (name.clone(), stats.clone()))
                .collect(),
        }
    }
}
