use anyhow::{Context, Result};
use std::process::Command;

use crate::error::PipelineError;

/// Run an external tool and block until it terminates. A nonzero exit status
/// is fatal for the whole run; external tool failure is not a recoverable
/// per-sample condition.
pub fn run_checked(tool: &str, command: &mut Command) -> Result<()> {
    let status = command
        .status()
        .with_context(|| format!("failed to launch {tool}"))?;
    if !status.success() {
        return Err(PipelineError::ToolFailed {
            tool: tool.to_string(),
            status,
        }
        .into());
    }
    Ok(())
}

/// Check that a tool resolves on PATH before committing to a run.
pub fn check_tool(program: &str) -> Result<()> {
    Command::new(program)
        .arg("--version")
        .output()
        .with_context(|| {
            format!("{program} not found. Please install it and ensure it's in your PATH")
        })
        .map(|_| ())
}
