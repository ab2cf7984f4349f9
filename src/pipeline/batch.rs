use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ThresholdConfig;
use crate::pipeline::report::SampleReport;
use crate::pipeline::sequencer::{SampleOutcome, SampleSequencer};
use crate::pipeline::types::Sample;
use crate::stages::StageRunner;
use crate::utils::runlog::RunLog;

/// Runs the sequencer for each discovered sample in turn, strictly
/// sequentially. One sample's breakpoint abort never prevents the remaining
/// samples from being attempted; fatal errors still end the whole batch.
pub struct BatchDriver<'a> {
    runner: &'a dyn StageRunner,
    thresholds: &'a ThresholdConfig,
}

impl<'a> BatchDriver<'a> {
    pub fn new(runner: &'a dyn StageRunner, thresholds: &'a ThresholdConfig) -> Self {
        Self { runner, thresholds }
    }

    pub fn run(&self, samples: Vec<Sample>, log: &mut RunLog) -> Result<Vec<SampleReport>> {
        let sequencer = SampleSequencer::new(self.runner, self.thresholds);

        let progress = ProgressBar::new(samples.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut reports = Vec::with_capacity(samples.len());
        for mut sample in samples {
            progress.set_message(format!("Processing {}", sample.id));
            log.event(&format!("Running analysis for sample {}", sample.id))?;

            let outcome = sequencer.process(&mut sample, log)?;
            match &outcome {
                SampleOutcome::Completed => {
                    log.event(&format!(
                        "Finished analysis for sample {} successfully",
                        sample.id
                    ))?;
                }
                SampleOutcome::Aborted { checkpoint, reason } => {
                    log.event(&format!(
                        "Stopped analysis for sample {} at the {} checkpoint: {}",
                        sample.id, checkpoint, reason
                    ))?;
                }
            }

            reports.push(SampleReport::from_sample(&sample));
            progress.inc(1);
        }

        progress.finish_with_message("batch complete");
        Ok(reports)
    }
}
