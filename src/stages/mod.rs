pub mod fastqc;
pub mod flash;
pub mod malt;
pub mod prinseq;

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::summary::QualitySummary;
use crate::pipeline::types::{ProcessingMode, Sample, Stage};
use crate::samples::is_read_file;
use crate::workspace::Workspace;

/// Boundary to the external processing tools. The sequencer only needs to
/// start a named step, block until it finishes, and read back a structured
/// quality summary for the stage output.
pub trait StageRunner {
    fn run_stage(&self, sample: &Sample, stage: Stage) -> Result<()>;
    fn quality_summary(&self, sample: &Sample, stage: Stage) -> Result<QualitySummary>;
}

/// Production runner that shells out to the configured tools.
pub struct ShellStageRunner<'a> {
    config: &'a PipelineConfig,
    workspace: &'a Workspace,
}

impl<'a> ShellStageRunner<'a> {
    pub fn new(config: &'a PipelineConfig, workspace: &'a Workspace) -> Self {
        Self { config, workspace }
    }
}

impl StageRunner for ShellStageRunner<'_> {
    fn run_stage(&self, sample: &Sample, stage: Stage) -> Result<()> {
        match stage {
            // Raw reads already exist; the stage only produces their report.
            Stage::Raw => {}
            Stage::Trimmed => prinseq::trim(self.config, self.workspace, sample)?,
            Stage::Merged => flash::merge(self.config, self.workspace, sample)?,
            Stage::Filtered => prinseq::filter(self.config, self.workspace, sample)?,
            Stage::Aligned => malt::align(self.config, self.workspace, sample)?,
        }
        if stage.records_summary() {
            fastqc::report(self.config, self.workspace, sample, stage)?;
        }
        Ok(())
    }

    fn quality_summary(&self, sample: &Sample, stage: Stage) -> Result<QualitySummary> {
        fastqc::summary(self.config, self.workspace, sample, stage)
    }
}

/// Locate a sample's raw read file(s) in the input directory. Paired mode
/// expects one file per pair tag; a missing file is fatal.
pub(crate) fn raw_reads(
    config: &PipelineConfig,
    workspace: &Workspace,
    sample: &Sample,
) -> Result<Vec<PathBuf>> {
    let dir = workspace.raw_reads_dir();
    match sample.mode {
        ProcessingMode::Paired => Ok(vec![
            find_read(dir, &format!("{}{}", sample.id, config.pair_tag_r1))?,
            find_read(dir, &format!("{}{}", sample.id, config.pair_tag_r2))?,
        ]),
        ProcessingMode::Single => Ok(vec![find_read(dir, &sample.id)?]),
    }
}

/// Read files produced by a stage, in pair order where applicable.
pub(crate) fn stage_reads(
    config: &PipelineConfig,
    workspace: &Workspace,
    sample: &Sample,
    stage: Stage,
) -> Result<Vec<PathBuf>> {
    let paths = match (stage, sample.mode) {
        (Stage::Raw, _) => return raw_reads(config, workspace, sample),
        (Stage::Trimmed, ProcessingMode::Paired) => vec![
            workspace.trimmed_read(&sample.id, Some(1)),
            workspace.trimmed_read(&sample.id, Some(2)),
        ],
        (Stage::Trimmed, ProcessingMode::Single) => {
            vec![workspace.trimmed_read(&sample.id, None)]
        }
        (Stage::Merged, _) => vec![workspace.merged_read(&sample.id)],
        (Stage::Filtered, _) => vec![workspace.filtered_read(&sample.id)],
        (Stage::Aligned, _) => Vec::new(),
    };
    for path in &paths {
        if !path.is_file() {
            return Err(PipelineError::MissingInput {
                stage,
                path: path.clone(),
            }
            .into());
        }
    }
    Ok(paths)
}

fn find_read(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(dir).map_err(|_| PipelineError::MissingInput {
        stage: Stage::Raw,
        path: dir.to_path_buf(),
    })?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && is_read_file(&name) && entry.path().is_file() {
            matches.push(entry.path());
        }
    }
    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or_else(|| {
            PipelineError::MissingInput {
                stage: Stage::Raw,
                path: dir.join(format!("{prefix}*")),
            }
            .into()
        })
}
