//! Splitting the corpus by completion status and aggregating each part.

use tracing::info;

use crate::aggregate::{CategoryStats, FunctionStats, aggregate_categories, aggregate_functions};
use crate::categorize::Categorizer;
use crate::config::EngineConfig;
use crate::error::{Result, Scope};
use crate::model::Corpus;

/// Instances with a known runtime, split at the timeout sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partitions {
    /// Runtime at or above the sentinel.
    pub timed_out: Corpus,
    /// Runtime below the sentinel.
    pub completed: Corpus,
}

/// Split `corpus` at `timeout_secs`. Instances whose execution log was
/// missing belong to neither side.
pub fn partition(corpus: &Corpus, timeout_secs: f64) -> Partitions {
    Partitions {
        timed_out: corpus.filter(|s| s.runtime_secs.is_some_and(|t| t >= timeout_secs)),
        completed: corpus.filter(|s| s.runtime_secs.is_some_and(|t| t < timeout_secs)),
    }
}

/// Function and category budgets of one scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeStats {
    pub functions: FunctionStats,
    pub categories: CategoryStats,
}

impl ScopeStats {
    pub fn compute<C: Categorizer + ?Sized>(
        corpus: &Corpus,
        categorizer: &C,
        normalize: bool,
        scope: Scope,
    ) -> Result<Self> {
        let functions = aggregate_functions(corpus, categorizer, normalize, scope)?;
        let categories = aggregate_categories(&functions, scope)?;
        Ok(Self {
            functions,
            categories,
        })
    }
}

/// Every view derived from one corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub corpus: Corpus,
    pub partitions: Partitions,
    pub full: ScopeStats,
    pub timed_out: ScopeStats,
    pub completed: ScopeStats,
}

impl Analysis {
    /// Aggregate the full corpus and both partitions.
    ///
    /// Fails on the first scope whose total time is zero, naming it.
    pub fn compute<C: Categorizer + ?Sized>(
        corpus: Corpus,
        categorizer: &C,
        config: &EngineConfig,
    ) -> Result<Self> {
        let partitions = partition(&corpus, config.timeout_secs);
        info!(
            instances = corpus.len(),
            timed_out = partitions.timed_out.len(),
            completed = partitions.completed.len(),
            "partitioned corpus"
        );

        let full = ScopeStats::compute(&corpus, categorizer, config.normalize, Scope::Full)?;
        let timed_out = ScopeStats::compute(
            &partitions.timed_out,
            categorizer,
            config.normalize,
            Scope::TimedOut,
        )?;
        let completed = ScopeStats::compute(
            &partitions.completed,
            categorizer,
            config.normalize,
            Scope::Completed,
        )?;

        Ok(Self {
            corpus,
            partitions,
            full,
            timed_out,
            completed,
        })
    }

    pub fn scope(&self, scope: Scope) -> &ScopeStats {
        match scope {
            Scope::Full => &self.full,
            Scope::TimedOut => &self.timed_out,
            Scope::Completed => &self.completed,
        }
    }
}
