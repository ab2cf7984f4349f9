use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ThresholdConfig;
use crate::pipeline::summary::QualitySummary;
use crate::pipeline::types::Stage;

/// Summaries of the stages a sample has already passed, keyed by stage.
pub type StageSummaries = BTreeMap<Stage, QualitySummary>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Continue,
    Abort,
}

/// The threshold a checkpoint tripped, with the numbers that tripped it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    AbsoluteFloor { read_count: u64, floor: u64 },
    RelativeLoss { baseline: Stage, loss: f64, max_loss: f64 },
}

/// Outcome of one checkpoint evaluation. Created here, consumed by the
/// sequencer for control flow and by the run log for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakpointDecision {
    pub checkpoint: Stage,
    pub verdict: Verdict,
    pub violation: Option<Violation>,
    pub reason: String,
}

/// Fractional read loss between two stages. A zero-read baseline is defined
/// as total loss (1.0), so any threshold below 1.0 aborts.
pub fn loss_ratio(current: &QualitySummary, reference: &QualitySummary) -> f64 {
    if reference.read_count == 0 {
        return 1.0;
    }
    1.0 - current.read_count as f64 / reference.read_count as f64
}

/// Decide whether a sample continues past a checkpoint. Checks run in a
/// fixed order and the first violation wins: the absolute read-count floor,
/// then the loss against the immediately preceding recorded stage, then the
/// loss against the raw baseline. Thresholds are strict: meeting one exactly
/// passes.
pub fn evaluate(
    current: &QualitySummary,
    references: &StageSummaries,
    config: &ThresholdConfig,
    stage: Stage,
) -> BreakpointDecision {
    if let Some(floor) = absolute_floor(config, stage) {
        if current.read_count < floor {
            return abort(
                stage,
                format!(
                    "read count of only {} is below the {} floor of {}",
                    current.read_count, stage, floor
                ),
                Violation::AbsoluteFloor {
                    read_count: current.read_count,
                    floor,
                },
            );
        }
    }

    for (baseline, max_loss) in relative_checks(config, stage, references) {
        // Only compare against baselines that were actually recorded; a
        // skipped stage never serves as a reference.
        if let Some(reference) = references.get(&baseline) {
            let loss = loss_ratio(current, reference);
            if loss > max_loss {
                return abort(
                    stage,
                    format!(
                        "loss of {:.3} compared to {} read counts exceeds the allowed {:.3}",
                        loss, baseline, max_loss
                    ),
                    Violation::RelativeLoss {
                        baseline,
                        loss,
                        max_loss,
                    },
                );
            }
        }
    }

    BreakpointDecision {
        checkpoint: stage,
        verdict: Verdict::Continue,
        violation: None,
        reason: "within thresholds".to_string(),
    }
}

fn abort(stage: Stage, reason: String, violation: Violation) -> BreakpointDecision {
    BreakpointDecision {
        checkpoint: stage,
        verdict: Verdict::Abort,
        violation: Some(violation),
        reason,
    }
}

fn absolute_floor(config: &ThresholdConfig, stage: Stage) -> Option<u64> {
    match stage {
        Stage::Raw => Some(config.raw_absolute_min),
        Stage::Filtered => Some(config.filtered_absolute_min),
        _ => None,
    }
}

/// Relative-loss baselines for a checkpoint, in evaluation order. The
/// filtered stage is compared against its immediate predecessor (merged in
/// paired mode, trimmed in single mode) and then against the raw baseline.
fn relative_checks(
    config: &ThresholdConfig,
    stage: Stage,
    references: &StageSummaries,
) -> Vec<(Stage, f64)> {
    match stage {
        Stage::Trimmed => vec![(Stage::Raw, config.raw_to_trimmed_max_loss)],
        Stage::Filtered => {
            let predecessor = if references.contains_key(&Stage::Merged) {
                Stage::Merged
            } else {
                Stage::Trimmed
            };
            vec![
                (predecessor, config.trimmed_to_filtered_max_loss),
                (Stage::Raw, config.raw_to_filtered_max_loss),
            ]
        }
        _ => Vec::new(),
    }
}
