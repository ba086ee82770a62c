use serde::{Deserialize, Serialize};

/// Time charged to one function across a scope of instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionAttribution {
    /// Seconds, summed over every instance containing the function.
    pub time: f64,
    /// `time` as a fraction of the scope's total runtime.
    pub pct: f64,
    pub category: String,
}

/// Time charged to one category across a scope of instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAttribution {
    pub time: f64,
    pub pct: f64,
}
