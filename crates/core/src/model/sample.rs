use serde::{Deserialize, Serialize};

use crate::categorize::UNCATEGORIZED;

/// One retained call-graph line of a profiler report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEntry {
    /// Share of samples in this symbol's call subtree, in percent.
    pub children_pct: f64,
    /// Share of samples attributed directly to this symbol, in percent.
    pub self_pct: f64,
    pub command: String,
    pub module: String,
    pub symbol: String,
    pub category: String,
    /// `self_pct` rescaled so the entries of one instance sum to 1.0.
    pub norm_self_pct: f64,
}

impl SampleEntry {
    /// Build an entry straight out of the parser, before normalization and
    /// categorization have run.
    pub fn new(
        children_pct: f64,
        self_pct: f64,
        command: impl Into<String>,
        module: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            children_pct,
            self_pct,
            command: command.into(),
            module: module.into(),
            symbol: symbol.into(),
            category: UNCATEGORIZED.to_string(),
            norm_self_pct: 0.0,
        }
    }

    /// Fraction of the instance runtime charged to this symbol.
    pub fn weight(&self, normalize: bool) -> f64 {
        if normalize {
            self.norm_self_pct
        } else {
            self.self_pct / 100.0
        }
    }
}
