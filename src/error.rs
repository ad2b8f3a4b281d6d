//! Error types for the benchmark pipeline.
//!
//! Every fatal condition maps to exactly one pipeline stage so the binary can
//! tell the user where the run stopped.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    EnsureDependency,
    RunHarness,
    ExtractResults,
    WriteReport,
    CheckDashboard,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::EnsureDependency => "ensure-dependency",
            Stage::RunHarness => "run-harness",
            Stage::ExtractResults => "extract-results",
            Stage::WriteReport => "write-report",
            Stage::CheckDashboard => "check-dashboard",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to install {tool}: {reason}")]
    DependencyInstall { tool: String, reason: String },

    #[error("benchmark harness failed for group `{group}`: {reason}")]
    HarnessExecution { group: String, reason: String },

    #[error("malformed estimate file {}: {reason}", path.display())]
    MalformedEstimate { path: PathBuf, reason: String },

    #[error("failed to walk harness output under {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write report {}: {reason}", path.display())]
    ReportWrite { path: PathBuf, reason: String },
}

impl PipelineError {
    /// Stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::DependencyInstall { .. } => Stage::EnsureDependency,
            PipelineError::HarnessExecution { .. } => Stage::RunHarness,
            PipelineError::MalformedEstimate { .. } | PipelineError::Walk { .. } => {
                Stage::ExtractResults
            }
            PipelineError::ReportWrite { .. } => Stage::WriteReport,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
