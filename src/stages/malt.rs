use anyhow::Result;
use std::process::Command;

use crate::config::PipelineConfig;
use crate::pipeline::types::{Sample, Stage};
use crate::utils::external_tools::run_checked;
use crate::workspace::Workspace;

/// Taxonomically align the filtered reads. Alignment is terminal; its output
/// is never gated or inspected by the core.
pub fn align(config: &PipelineConfig, workspace: &Workspace, sample: &Sample) -> Result<()> {
    let reads = super::stage_reads(config, workspace, sample, Stage::Filtered)?;
    let out_dir = workspace.stage_dir(Stage::Aligned);

    let mut command = Command::new(&config.tools.malt);
    command
        .arg("-m")
        .arg("BlastN")
        .arg("-at")
        .arg("SemiGlobal")
        .arg("-t")
        .arg(config.threads.to_string())
        .arg("-rqc")
        .arg("true")
        .arg("-supp")
        .arg(config.align.min_support.to_string())
        .arg("-e")
        .arg(config.align.max_evalue.to_string())
        .arg("-mpi")
        .arg(config.align.min_percent_identity.to_string())
        .arg("-top")
        .arg(config.align.top_percent.to_string())
        .arg("-i")
        .arg(&reads[0])
        .arg("-d")
        .arg(&config.tools.malt_db)
        .arg("-o")
        .arg(&out_dir);

    run_checked(&config.tools.malt, &mut command)
}
