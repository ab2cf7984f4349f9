use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::PipelineError;

const READ_COUNT_PREFIX: &str = "Total Sequences";
const LENGTH_PREFIX: &str = "Sequence length";

/// Structured digest of one stage's quality report for one sample.
/// Immutable once produced; the core never fabricates one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualitySummary {
    pub min_length: u32,
    pub max_length: u32,
    pub read_count: u64,
}

impl QualitySummary {
    /// Parse a quality report. Each recognized key is a fixed line prefix and
    /// its value is the last tab-separated field on that line. The length
    /// value is either a single integer (min = max) or a `min-max` range.
    ///
    /// A missing key leaves the corresponding field at zero. That is a
    /// degenerate but valid summary, not an error; it will simply fail the
    /// absolute-floor checks downstream.
    pub fn parse(report: &str) -> QualitySummary {
        let mut summary = QualitySummary::default();
        for line in report.lines() {
            if let Some(value) = field_value(line, READ_COUNT_PREFIX) {
                summary.read_count = value.parse().unwrap_or(0);
            } else if let Some(value) = field_value(line, LENGTH_PREFIX) {
                let (min, max) = match value.split_once('-') {
                    Some((lo, hi)) => (lo.parse().unwrap_or(0), hi.parse().unwrap_or(0)),
                    None => {
                        let n = value.parse().unwrap_or(0);
                        (n, n)
                    }
                };
                summary.min_length = min;
                summary.max_length = max;
            }
        }
        summary
    }

    /// Read and parse a report file. A missing report is fatal for the run.
    pub fn from_report(path: &Path) -> Result<QualitySummary> {
        let text = fs::read_to_string(path)
            .map_err(|_| PipelineError::ReportNotFound(path.to_path_buf()))?;
        Ok(QualitySummary::parse(&text))
    }
}

fn field_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if !line.starts_with(prefix) {
        return None;
    }
    line.trim_end().rsplit('\t').next()
}
