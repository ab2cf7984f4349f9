use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::summary::QualitySummary;
use crate::pipeline::types::{ProcessingMode, Sample, Stage};
use crate::utils::external_tools::run_checked;
use crate::workspace::Workspace;

/// Run the quality reporter over a stage's read files for one sample.
/// Reports land as `<name>_fastqc.zip` archives in the stage's qc directory.
pub fn report(
    config: &PipelineConfig,
    workspace: &Workspace,
    sample: &Sample,
    stage: Stage,
) -> Result<()> {
    let qc_dir = workspace.qc_dir(stage);
    fs::create_dir_all(&qc_dir)?;
    let reads = super::stage_reads(config, workspace, sample, stage)?;

    let mut command = Command::new(&config.tools.fastqc);
    command.arg("-noextract").arg("-o").arg(&qc_dir).args(&reads);
    run_checked(&config.tools.fastqc, &mut command)
}

/// Unpack the representative report archive for a stage and parse it into a
/// summary. In paired mode the second read of the pair stands in for the
/// sample at the raw and trimmed stages; merged and filtered outputs are
/// single files.
pub fn summary(
    config: &PipelineConfig,
    workspace: &Workspace,
    sample: &Sample,
    stage: Stage,
) -> Result<QualitySummary> {
    let qc_dir = workspace.qc_dir(stage);
    let prefix = representative_prefix(config, sample, stage);
    let archive = find_report_archive(&qc_dir, &prefix)?;
    unpack(&qc_dir, &archive)?;

    // `X_fastqc.zip` unpacks to `X_fastqc/fastqc_data.txt`.
    let data = archive
        .with_extension("")
        .join("fastqc_data.txt");
    QualitySummary::from_report(&data)
}

fn representative_prefix(config: &PipelineConfig, sample: &Sample, stage: Stage) -> String {
    let id = &sample.id;
    match (stage, sample.mode) {
        (Stage::Raw, ProcessingMode::Paired) => format!("{id}{}", short_tag(&config.pair_tag_r2)),
        (Stage::Raw, ProcessingMode::Single) => id.clone(),
        (Stage::Trimmed, ProcessingMode::Paired) => format!("{id}.trimmed_2"),
        (Stage::Trimmed, ProcessingMode::Single) => format!("{id}.trimmed"),
        (Stage::Merged, _) => format!("{id}.extendedFrags"),
        (Stage::Filtered, _) => format!("{id}.filtered"),
        (Stage::Aligned, _) => id.clone(),
    }
}

/// The report namer strips the fastq extensions, so a `.2.` pair tag shows
/// up as a `.2` suffix on the archive name.
fn short_tag(tag: &str) -> &str {
    tag.strip_suffix('.').unwrap_or(tag)
}

fn find_report_archive(qc_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(qc_dir)
        .map_err(|_| PipelineError::ReportNotFound(qc_dir.to_path_buf()))?;
    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with(prefix) && name.ends_with("_fastqc.zip")
        })
        .map(|entry| entry.path())
        .collect();
    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::ReportNotFound(qc_dir.join(format!("{prefix}*_fastqc.zip"))).into())
}

fn unpack(qc_dir: &Path, archive: &Path) -> Result<()> {
    let mut command = Command::new("unzip");
    command.arg("-o").arg("-d").arg(qc_dir).arg(archive);
    run_checked("unzip", &mut command)
}
