use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use tempfile::TempDir;

use ribogate::config::ThresholdConfig;
use ribogate::pipeline::{
    BatchDriver, ProcessingMode, QualitySummary, Sample, SampleOutcome, SampleSequencer,
    SampleStatus, Stage,
};
use ribogate::stages::StageRunner;
use ribogate::utils::runlog::RunLog;

/// In-memory collaborator: serves canned read counts instead of shelling out
/// and records every stage invocation.
struct MockRunner {
    counts: HashMap<(String, Stage), u64>,
    invoked: RefCell<Vec<(String, Stage)>>,
    fail_at: Option<(String, Stage)>,
}

impl MockRunner {
    fn with_counts(counts: &[(&str, Stage, u64)]) -> Self {
        Self {
            counts: counts
                .iter()
                .map(|&(id, stage, n)| ((id.to_string(), stage), n))
                .collect(),
            invoked: RefCell::new(Vec::new()),
            fail_at: None,
        }
    }

    fn failing_at(mut self, id: &str, stage: Stage) -> Self {
        self.fail_at = Some((id.to_string(), stage));
        self
    }

    fn stages_run_for(&self, id: &str) -> Vec<Stage> {
        self.invoked
            .borrow()
            .iter()
            .filter(|(sample, _)| sample == id)
            .map(|&(_, stage)| stage)
            .collect()
    }
}

impl StageRunner for MockRunner {
    fn run_stage(&self, sample: &Sample, stage: Stage) -> Result<()> {
        if let Some((id, failing)) = &self.fail_at {
            if id == &sample.id && *failing == stage {
                bail!("simulated tool failure for {} at {}", id, stage);
            }
        }
        self.invoked.borrow_mut().push((sample.id.clone(), stage));
        Ok(())
    }

    fn quality_summary(&self, sample: &Sample, stage: Stage) -> Result<QualitySummary> {
        self.counts
            .get(&(sample.id.clone(), stage))
            .map(|&read_count| QualitySummary {
                min_length: 75,
                max_length: 250,
                read_count,
            })
            .ok_or_else(|| anyhow!("no summary configured for {} at {}", sample.id, stage))
    }
}

fn test_log(dir: &TempDir) -> RunLog {
    RunLog::create(&dir.path().join("test.log")).unwrap()
}

fn thresholds() -> ThresholdConfig {
    ThresholdConfig::default()
}

#[test]
fn paired_sample_runs_every_stage_and_completes() {
    let runner = MockRunner::with_counts(&[
        ("s1", Stage::Raw, 20_000),
        ("s1", Stage::Trimmed, 15_000),
        ("s1", Stage::Merged, 12_000),
        ("s1", Stage::Filtered, 11_000),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let mut sample = Sample::new("s1", ProcessingMode::Paired);

    let config = thresholds();
    let outcome = SampleSequencer::new(&runner, &config)
        .process(&mut sample, &mut log)
        .unwrap();

    assert_eq!(outcome, SampleOutcome::Completed);
    assert_eq!(sample.status, SampleStatus::Completed);
    assert_eq!(
        runner.stages_run_for("s1"),
        vec![
            Stage::Raw,
            Stage::Trimmed,
            Stage::Merged,
            Stage::Filtered,
            Stage::Aligned,
        ]
    );
    // Alignment records no summary; the four quality stages do, in order.
    let recorded: Vec<Stage> = sample.summaries().iter().map(|&(s, _)| s).collect();
    assert_eq!(
        recorded,
        vec![Stage::Raw, Stage::Trimmed, Stage::Merged, Stage::Filtered]
    );
}

#[test]
fn single_mode_never_invokes_the_merge_stage() {
    let runner = MockRunner::with_counts(&[
        ("s1", Stage::Raw, 20_000),
        ("s1", Stage::Trimmed, 15_000),
        ("s1", Stage::Filtered, 14_000),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let mut sample = Sample::new("s1", ProcessingMode::Single);

    let config = thresholds();
    let outcome = SampleSequencer::new(&runner, &config)
        .process(&mut sample, &mut log)
        .unwrap();

    assert_eq!(outcome, SampleOutcome::Completed);
    assert!(!runner.stages_run_for("s1").contains(&Stage::Merged));
}

#[test]
fn abort_at_trimmed_skips_the_remaining_stages() {
    // 70% loss against a 60% cap.
    let runner = MockRunner::with_counts(&[
        ("s1", Stage::Raw, 10_000),
        ("s1", Stage::Trimmed, 3_000),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let mut sample = Sample::new("s1", ProcessingMode::Paired);

    let config = thresholds();
    let outcome = SampleSequencer::new(&runner, &config)
        .process(&mut sample, &mut log)
        .unwrap();

    match &outcome {
        SampleOutcome::Aborted { checkpoint, reason } => {
            assert_eq!(*checkpoint, Stage::Trimmed);
            assert!(reason.contains("raw"));
        }
        other => panic!("expected an abort, got {:?}", other),
    }
    assert_eq!(
        runner.stages_run_for("s1"),
        vec![Stage::Raw, Stage::Trimmed]
    );
    // Nothing is recorded past the abort point.
    assert!(sample.summary(Stage::Merged).is_none());
    assert!(sample.summary(Stage::Filtered).is_none());
}

#[test]
fn filtered_checkpoint_uses_merged_and_raw_baselines() {
    // Merged-baseline loss 0.1 passes the 0.3 cap; raw-baseline loss 0.55
    // fails its 0.3 cap, so the sample aborts at the filtered checkpoint.
    let runner = MockRunner::with_counts(&[
        ("s1", Stage::Raw, 10_000),
        ("s1", Stage::Trimmed, 9_000),
        ("s1", Stage::Merged, 5_000),
        ("s1", Stage::Filtered, 4_500),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let mut sample = Sample::new("s1", ProcessingMode::Paired);

    let config = ThresholdConfig {
        raw_absolute_min: 1_000,
        filtered_absolute_min: 1_000,
        raw_to_trimmed_max_loss: 0.6,
        raw_to_filtered_max_loss: 0.3,
        trimmed_to_filtered_max_loss: 0.3,
    };
    let outcome = SampleSequencer::new(&runner, &config)
        .process(&mut sample, &mut log)
        .unwrap();

    match &outcome {
        SampleOutcome::Aborted { checkpoint, reason } => {
            assert_eq!(*checkpoint, Stage::Filtered);
            assert!(reason.contains("raw"), "reason was: {reason}");
        }
        other => panic!("expected an abort, got {:?}", other),
    }
}

#[test]
fn batch_isolates_one_samples_abort_from_the_rest() {
    let runner = MockRunner::with_counts(&[
        ("a", Stage::Raw, 20_000),
        ("a", Stage::Trimmed, 15_000),
        ("a", Stage::Merged, 12_000),
        ("a", Stage::Filtered, 11_000),
        // Sample b loses too many reads to trimming.
        ("b", Stage::Raw, 10_000),
        ("b", Stage::Trimmed, 3_000),
        ("c", Stage::Raw, 20_000),
        ("c", Stage::Trimmed, 15_000),
        ("c", Stage::Merged, 12_000),
        ("c", Stage::Filtered, 11_000),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let samples = vec![
        Sample::new("a", ProcessingMode::Paired),
        Sample::new("b", ProcessingMode::Paired),
        Sample::new("c", ProcessingMode::Paired),
    ];

    let config = thresholds();
    let reports = BatchDriver::new(&runner, &config)
        .run(samples, &mut log)
        .unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].status, "completed");
    assert_eq!(reports[1].status, "aborted");
    assert!(reports[1].reason.is_some());
    assert_eq!(reports[2].status, "completed");

    // Sample c ran to completion even though b aborted before it.
    assert!(runner.stages_run_for("c").contains(&Stage::Aligned));

    let logged = std::fs::read_to_string(dir.path().join("test.log")).unwrap();
    assert!(logged.contains("Breakpoint"));
}

#[test]
fn a_failing_tool_is_fatal_for_the_whole_batch() {
    let runner = MockRunner::with_counts(&[
        ("a", Stage::Raw, 20_000),
        ("b", Stage::Raw, 20_000),
    ])
    .failing_at("a", Stage::Trimmed);
    let dir = tempfile::tempdir().unwrap();
    let mut log = test_log(&dir);
    let samples = vec![
        Sample::new("a", ProcessingMode::Paired),
        Sample::new("b", ProcessingMode::Paired),
    ];

    let config = thresholds();
    let result = BatchDriver::new(&runner, &config).run(samples, &mut log);

    assert!(result.is_err());
    // Sample b was never attempted; the failure is not a per-sample abort.
    assert!(runner.stages_run_for("b").is_empty());
}
