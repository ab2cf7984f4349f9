use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::types::{ProcessingMode, Stage};

/// Per-run directory tree. Stage outputs land in numbered directories under
/// the output root; raw reads are referenced in place from the input
/// directory and only their quality reports live under `00_RAW`.
#[derive(Debug, Clone)]
pub struct Workspace {
    input_dir: PathBuf,
    out_root: PathBuf,
    mode: ProcessingMode,
}

impl Workspace {
    /// Create the stage directory tree. A missing input directory is fatal
    /// for the run before any sample is touched.
    pub fn create(input_dir: &Path, out_root: &Path, mode: ProcessingMode) -> Result<Self> {
        if !input_dir.is_dir() {
            bail!(
                "input directory {} does not exist or is not a directory",
                input_dir.display()
            );
        }
        fs::create_dir_all(out_root)
            .with_context(|| format!("creating output directory {}", out_root.display()))?;

        let workspace = Self {
            input_dir: input_dir.to_path_buf(),
            out_root: out_root.to_path_buf(),
            mode,
        };
        for &stage in Stage::sequence(mode) {
            let dir = workspace.stage_dir(stage);
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating stage directory {}", dir.display()))?;
            if stage.records_summary() {
                fs::create_dir_all(dir.join("fastqc"))?;
            }
        }
        Ok(workspace)
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    /// Directory holding the raw read files themselves.
    pub fn raw_reads_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        let name = match (self.mode, stage) {
            (_, Stage::Raw) => "00_RAW",
            (_, Stage::Trimmed) => "01_trimmed",
            (ProcessingMode::Paired, Stage::Merged) => "02_merged",
            (ProcessingMode::Paired, Stage::Filtered) => "03_filtered",
            (ProcessingMode::Paired, Stage::Aligned) => "04_aligned",
            (ProcessingMode::Single, Stage::Filtered) => "02_filtered",
            (ProcessingMode::Single, Stage::Aligned) => "03_aligned",
            (ProcessingMode::Single, Stage::Merged) => {
                unreachable!("single mode has no merge stage")
            }
        };
        self.out_root.join(name)
    }

    /// Where a stage's quality reports are unpacked.
    pub fn qc_dir(&self, stage: Stage) -> PathBuf {
        self.stage_dir(stage).join("fastqc")
    }

    pub fn trimmed_read(&self, sample_id: &str, pair: Option<u8>) -> PathBuf {
        let name = match pair {
            Some(n) => format!("{sample_id}.trimmed_{n}.fastq"),
            None => format!("{sample_id}.trimmed.fastq"),
        };
        self.stage_dir(Stage::Trimmed).join(name)
    }

    /// The overlap merger writes `<prefix>.extendedFrags.fastq`; downstream
    /// stages read that name directly instead of renaming it.
    pub fn merged_read(&self, sample_id: &str) -> PathBuf {
        self.stage_dir(Stage::Merged)
            .join(format!("{sample_id}.extendedFrags.fastq"))
    }

    pub fn filtered_read(&self, sample_id: &str) -> PathBuf {
        self.stage_dir(Stage::Filtered)
            .join(format!("{sample_id}.filtered.fastq"))
    }
}
