use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Runtime substituted for instances whose completion cannot be confirmed.
pub const DEFAULT_TIMEOUT_SECS: f64 = 3600.0;

/// Compilers the engine has been pointed at so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    C2d,
    MiniC2d,
}

impl Compiler {
    /// Module (binary) name the profiler attributes samples to.
    pub fn module_name(self) -> &'static str {
        match self {
            Self::C2d => "c2d",
            Self::MiniC2d => "miniC2D",
        }
    }
}

/// Policy knobs for one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Only samples attributed to this module are retained.
    pub module: String,
    /// Timeout sentinel in seconds.
    pub timeout_secs: f64,
    /// Prefix of the execution log line carrying the runtime.
    pub runtime_prefix: String,
    /// Extension (without the dot) of profiler report files.
    pub report_extension: String,
    /// Extension (without the dot) of execution log files.
    pub log_extension: String,
    /// Weight samples by `norm_self_pct` instead of `self_pct / 100`.
    pub normalize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_compiler(Compiler::C2d)
    }
}

impl EngineConfig {
    pub fn for_compiler(compiler: Compiler) -> Self {
        Self {
            module: compiler.module_name().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            runtime_prefix: "Total Time:".to_string(),
            report_extension: "log".to_string(),
            log_extension: "log".to_string(),
            normalize: true,
        }
    }

    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_slice(&data).map_err(|e| Error::json(path, e))
    }
}
