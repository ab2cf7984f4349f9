use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::pipeline::breakpoint::{BreakpointDecision, Verdict};
use crate::pipeline::summary::QualitySummary;
use crate::pipeline::types::{Sample, Stage};

/// Append-only run log, one writer per run. Entries are timestamped and
/// flushed as they are written so an interrupted run still leaves its trail.
pub struct RunLog {
    writer: BufWriter<File>,
}

impl RunLog {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("creating run log {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn event(&mut self, message: &str) -> Result<()> {
        writeln!(
            self.writer,
            "{}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn sample_list(&mut self, samples: &[Sample]) -> Result<()> {
        self.event("Samples that will be analyzed:")?;
        for sample in samples {
            writeln!(self.writer, "{}", sample.id)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn summary(&mut self, sample_id: &str, stage: Stage, summary: &QualitySummary) -> Result<()> {
        self.event(&format!(
            "{} QC for sample {}: minimal read length {}, maximal read length {}, number of reads {}",
            stage, sample_id, summary.min_length, summary.max_length, summary.read_count
        ))
    }

    /// Record a checkpoint decision for post-run auditing.
    pub fn decision(&mut self, sample_id: &str, decision: &BreakpointDecision) -> Result<()> {
        match decision.verdict {
            Verdict::Abort => self.event(&format!(
                "Breakpoint: {} QC for sample {} failed: {}",
                decision.checkpoint, sample_id, decision.reason
            )),
            Verdict::Continue => self.event(&format!(
                "{} QC for sample {} passed: {}",
                decision.checkpoint, sample_id, decision.reason
            )),
        }
    }
}
