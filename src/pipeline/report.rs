use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::pipeline::summary::QualitySummary;
use crate::pipeline::types::{ProcessingMode, Sample, SampleStatus, Stage};

#[derive(Debug, Serialize)]
pub struct StageSummaryExport {
    pub stage: Stage,
    #[serde(flatten)]
    pub summary: QualitySummary,
}

/// One record per sample in the end-of-run report.
#[derive(Debug, Serialize)]
pub struct SampleReport {
    pub id: String,
    pub mode: ProcessingMode,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub stages: Vec<StageSummaryExport>,
}

impl SampleReport {
    pub fn from_sample(sample: &Sample) -> Self {
        let (status, reason) = match &sample.status {
            SampleStatus::InProgress => ("in-progress", None),
            SampleStatus::Completed => ("completed", None),
            SampleStatus::Aborted(reason) => ("aborted", Some(reason.clone())),
        };
        Self {
            id: sample.id.clone(),
            mode: sample.mode,
            status,
            reason,
            stages: sample
                .summaries()
                .iter()
                .map(|&(stage, summary)| StageSummaryExport { stage, summary })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub run_name: String,
    pub finished: String,
    pub samples: Vec<SampleReport>,
}

impl PipelineReport {
    pub fn new(run_name: impl Into<String>, samples: Vec<SampleReport>) -> Self {
        Self {
            run_name: run_name.into(),
            finished: Local::now().to_rfc3339(),
            samples,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}
