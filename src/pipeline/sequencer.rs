use anyhow::Result;

use crate::config::ThresholdConfig;
use crate::pipeline::breakpoint::{self, StageSummaries, Verdict};
use crate::pipeline::types::{Sample, SampleStatus, Stage};
use crate::stages::StageRunner;
use crate::utils::runlog::RunLog;

/// Terminal result of one sample's trip through the stage sequence. A
/// breakpoint abort is a value here, not an error; fatal conditions (missing
/// inputs, tool failures, missing reports) still propagate as `Err` and take
/// the whole run down.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Completed,
    Aborted { checkpoint: Stage, reason: String },
}

/// Drives a single sample through its ordered stage list, invoking the
/// external collaborator for each stage and gating on quality at the
/// raw, trimmed and filtered checkpoints.
pub struct SampleSequencer<'a> {
    runner: &'a dyn StageRunner,
    thresholds: &'a ThresholdConfig,
}

impl<'a> SampleSequencer<'a> {
    pub fn new(runner: &'a dyn StageRunner, thresholds: &'a ThresholdConfig) -> Self {
        Self { runner, thresholds }
    }

    pub fn process(&self, sample: &mut Sample, log: &mut RunLog) -> Result<SampleOutcome> {
        for &stage in Stage::sequence(sample.mode) {
            self.runner.run_stage(sample, stage)?;
            if !stage.records_summary() {
                continue;
            }

            let summary = self.runner.quality_summary(sample, stage)?;
            log.summary(&sample.id, stage, &summary)?;

            // References hold only stages recorded before this one.
            let references: StageSummaries = sample.summaries().iter().copied().collect();
            sample.record_summary(stage, summary);

            if stage.is_checkpoint() {
                let decision = breakpoint::evaluate(&summary, &references, self.thresholds, stage);
                log.decision(&sample.id, &decision)?;
                if decision.verdict == Verdict::Abort {
                    sample.status = SampleStatus::Aborted(decision.reason.clone());
                    return Ok(SampleOutcome::Aborted {
                        checkpoint: stage,
                        reason: decision.reason,
                    });
                }
            }
        }

        sample.status = SampleStatus::Completed;
        Ok(SampleOutcome::Completed)
    }
}
