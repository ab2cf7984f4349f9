use anyhow::Result;
use std::process::Command;

use crate::config::PipelineConfig;
use crate::pipeline::types::{ProcessingMode, Sample, Stage};
use crate::utils::external_tools::run_checked;
use crate::workspace::Workspace;

/// Quality-trim a sample's raw reads: sliding-window trim from the right
/// plus a fixed left trim. Outputs are written under their final names, so
/// no rename pass is needed afterwards.
pub fn trim(config: &PipelineConfig, workspace: &Workspace, sample: &Sample) -> Result<()> {
    let reads = super::raw_reads(config, workspace, sample)?;
    let trim_dir = workspace.stage_dir(Stage::Trimmed);

    let mut command = Command::new(&config.tools.prinseq);
    command
        .arg("-fastq")
        .arg(&reads[0])
        .arg("-threads")
        .arg(config.threads.to_string())
        .arg("-trim_qual_window")
        .arg(config.trim.window.to_string())
        .arg("-trim_qual_right")
        .arg(config.trim.quality.to_string())
        .arg("-trim_left")
        .arg(config.trim.left.to_string());

    match sample.mode {
        ProcessingMode::Paired => {
            command
                .arg("-fastq2")
                .arg(&reads[1])
                .arg("-out_good")
                .arg(workspace.trimmed_read(&sample.id, Some(1)))
                .arg("-out_good2")
                .arg(workspace.trimmed_read(&sample.id, Some(2)))
                .arg("-out_bad")
                .arg(trim_dir.join(format!("{}.trim.bad_1.fastq", sample.id)))
                .arg("-out_bad2")
                .arg(trim_dir.join(format!("{}.trim.bad_2.fastq", sample.id)));
        }
        ProcessingMode::Single => {
            command
                .arg("-out_good")
                .arg(workspace.trimmed_read(&sample.id, None))
                .arg("-out_bad")
                .arg(trim_dir.join(format!("{}.trim.bad.fastq", sample.id)));
        }
    }

    run_checked(&config.tools.prinseq, &mut command)
}

/// Drop reads below the configured minimum length. Paired samples filter the
/// merged output; single samples filter the trimmed output.
pub fn filter(config: &PipelineConfig, workspace: &Workspace, sample: &Sample) -> Result<()> {
    let input_stage = match sample.mode {
        ProcessingMode::Paired => Stage::Merged,
        ProcessingMode::Single => Stage::Trimmed,
    };
    let reads = super::stage_reads(config, workspace, sample, input_stage)?;
    let filter_dir = workspace.stage_dir(Stage::Filtered);

    let mut command = Command::new(&config.tools.prinseq);
    command
        .arg("-fastq")
        .arg(&reads[0])
        .arg("-threads")
        .arg(config.threads.to_string())
        .arg("-min_len")
        .arg(config.filter.min_length.to_string())
        .arg("-out_good")
        .arg(workspace.filtered_read(&sample.id))
        .arg("-out_bad")
        .arg(filter_dir.join(format!("{}.filtered.bad.fastq", sample.id)));

    run_checked(&config.tools.prinseq, &mut command)
}
