//! Turns `perf report` call-graph output from many profiled compiler runs
//! into per-function and per-category time budgets.
//!
//! ```text
//!   report ─▶ parsers::perf_report ─┐
//!                                   ├─▶ corpus ─▶ partition ─▶ aggregate ─▶ export
//!   log    ─▶ parsers::runtime_log ─┘     ▲
//!                                         └── categorize
//! ```

pub mod aggregate;
pub mod categorize;
pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod partition;

pub use aggregate::{CategoryStats, FunctionStats, aggregate_categories, aggregate_functions};
pub use categorize::{Categorizer, UNCATEGORIZED};
pub use config::{Compiler, EngineConfig};
pub use corpus::build_corpus;
pub use error::{Error, Level, Result, Scope};
pub use export::StatMode;
pub use partition::{Analysis, Partitions, ScopeStats, partition};
