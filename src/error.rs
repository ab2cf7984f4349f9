use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::pipeline::types::Stage;

/// Fatal pipeline errors. These terminate the whole run; a breakpoint abort
/// is not an error but a `SampleOutcome` value returned by the sequencer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("quality report not found under {0}")]
    ReportNotFound(PathBuf),

    #[error("missing input for the {stage} stage: {path}")]
    MissingInput { stage: Stage, path: PathBuf },

    #[error("{tool} failed: {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
