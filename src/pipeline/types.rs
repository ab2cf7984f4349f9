use serde::Serialize;
use std::fmt;

use crate::pipeline::summary::QualitySummary;

/// Whether a sample consists of a forward/reverse read pair merged before
/// filtering, or a single read file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Paired,
    Single,
}

/// One step of the pipeline. The variant order is the stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Raw,
    Trimmed,
    Merged,
    Filtered,
    Aligned,
}

impl Stage {
    /// Ordered stage list for a processing mode. Single mode has no merge
    /// stage.
    pub fn sequence(mode: ProcessingMode) -> &'static [Stage] {
        match mode {
            ProcessingMode::Paired => &[
                Stage::Raw,
                Stage::Trimmed,
                Stage::Merged,
                Stage::Filtered,
                Stage::Aligned,
            ],
            ProcessingMode::Single => &[Stage::Raw, Stage::Trimmed, Stage::Filtered, Stage::Aligned],
        }
    }

    /// Stages whose output gets a quality report. Alignment is terminal and
    /// its output is never inspected.
    pub fn records_summary(self) -> bool {
        !matches!(self, Stage::Aligned)
    }

    /// Stages followed by a breakpoint evaluation. The merged stage records a
    /// summary (it is the filtered stage's baseline in paired mode) but
    /// carries no gate of its own.
    pub fn is_checkpoint(self) -> bool {
        matches!(self, Stage::Raw | Stage::Trimmed | Stage::Filtered)
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Trimmed => "trimmed",
            Stage::Merged => "merged",
            Stage::Filtered => "filtered",
            Stage::Aligned => "aligned",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal status of a sample within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleStatus {
    InProgress,
    Completed,
    Aborted(String),
}

/// One sample moving through the stage sequence. Stage summaries are
/// append-only and strictly follow the stage order.
#[derive(Debug, Clone)]
pub struct Sample {
    pub id: String,
    pub mode: ProcessingMode,
    pub status: SampleStatus,
    summaries: Vec<(Stage, QualitySummary)>,
}

impl Sample {
    pub fn new(id: impl Into<String>, mode: ProcessingMode) -> Self {
        Self {
            id: id.into(),
            mode,
            status: SampleStatus::InProgress,
            summaries: Vec::new(),
        }
    }

    /// Recording a stage at or before the last recorded one is a programming
    /// error in the sequencer.
    pub fn record_summary(&mut self, stage: Stage, summary: QualitySummary) {
        debug_assert!(self.summaries.last().map_or(true, |(s, _)| *s < stage));
        self.summaries.push((stage, summary));
    }

    pub fn summary(&self, stage: Stage) -> Option<&QualitySummary> {
        self.summaries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, q)| q)
    }

    pub fn summaries(&self) -> &[(Stage, QualitySummary)] {
        &self.summaries
    }
}
