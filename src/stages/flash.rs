use anyhow::Result;
use std::process::Command;

use crate::config::PipelineConfig;
use crate::pipeline::types::{Sample, Stage};
use crate::utils::external_tools::run_checked;
use crate::workspace::Workspace;

/// Merge a trimmed read pair by overlap. The merger writes
/// `<prefix>.extendedFrags.fastq`, which the filter stage reads directly.
pub fn merge(config: &PipelineConfig, workspace: &Workspace, sample: &Sample) -> Result<()> {
    let reads = super::stage_reads(config, workspace, sample, Stage::Trimmed)?;
    let prefix = workspace.stage_dir(Stage::Merged).join(&sample.id);

    let mut command = Command::new(&config.tools.flash);
    command
        .arg("-m")
        .arg(config.merge.min_overlap.to_string())
        .arg("-M")
        .arg(config.merge.max_overlap.to_string())
        .arg("-o")
        .arg(&prefix)
        .arg(&reads[0])
        .arg(&reads[1]);

    run_checked(&config.tools.flash, &mut command)
}
