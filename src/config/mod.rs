use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::PipelineError;
use crate::pipeline::types::ProcessingMode;

/// Quality-gate thresholds, loaded once per run and read-only afterwards.
/// Loss bounds live in [0, 1]; comparisons against them are strict.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub raw_absolute_min: u64,
    pub filtered_absolute_min: u64,
    pub raw_to_trimmed_max_loss: f64,
    pub raw_to_filtered_max_loss: f64,
    pub trimmed_to_filtered_max_loss: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            raw_absolute_min: 10_000,
            filtered_absolute_min: 4_000,
            raw_to_trimmed_max_loss: 0.6,
            raw_to_filtered_max_loss: 0.7,
            trimmed_to_filtered_max_loss: 0.2,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("raw_to_trimmed_max_loss", self.raw_to_trimmed_max_loss),
            ("raw_to_filtered_max_loss", self.raw_to_filtered_max_loss),
            (
                "trimmed_to_filtered_max_loss",
                self.trimmed_to_filtered_max_loss,
            ),
        ];
        for (name, value) in bounds {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// External tool executables and the alignment database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tools {
    pub fastqc: String,
    pub prinseq: String,
    pub flash: String,
    pub malt: String,
    pub malt_db: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            fastqc: "fastqc".to_string(),
            prinseq: "prinseq++".to_string(),
            flash: "flash".to_string(),
            malt: "malt-run".to_string(),
            malt_db: "MALTdb".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimParams {
    pub window: u32,
    pub quality: u32,
    pub left: u32,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            window: 15,
            quality: 30,
            left: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeParams {
    pub min_overlap: u32,
    pub max_overlap: u32,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            min_overlap: 1,
            max_overlap: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterParams {
    pub min_length: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self { min_length: 75 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignParams {
    pub min_support: f64,
    pub max_evalue: f64,
    pub min_percent_identity: f64,
    pub top_percent: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            min_support: 0.001,
            max_evalue: 0.001,
            min_percent_identity: 75.0,
            top_percent: 10.0,
        }
    }
}

/// Whole-run configuration. Constructed once at startup and passed by
/// reference into the batch driver, sequencer and evaluator; there is no
/// ambient global state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Names the run log and the report.
    pub run_name: String,
    pub paired: bool,
    /// Substring tagging the forward read file of a pair.
    pub pair_tag_r1: String,
    /// Substring tagging the reverse read file of a pair.
    pub pair_tag_r2: String,
    pub threads: u32,
    pub tools: Tools,
    pub trim: TrimParams,
    pub merge: MergeParams,
    pub filter: FilterParams,
    pub align: AlignParams,
    pub thresholds: ThresholdConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            run_name: "ribogate".to_string(),
            paired: true,
            pair_tag_r1: ".1.".to_string(),
            pair_tag_r2: ".2.".to_string(),
            threads: 20,
            tools: Tools::default(),
            trim: TrimParams::default(),
            merge: MergeParams::default(),
            filter: FilterParams::default(),
            align: AlignParams::default(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration file. Malformed input surfaces a
    /// single structured error here instead of failing somewhere mid-run.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config: PipelineConfig =
            toml::from_str(&text).map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.run_name.is_empty() {
            return Err(PipelineError::InvalidConfig("run_name must not be empty".into()).into());
        }
        if self.paired && (self.pair_tag_r1.is_empty() || self.pair_tag_r2.is_empty()) {
            return Err(PipelineError::InvalidConfig(
                "pair tags must not be empty in paired mode".into(),
            )
            .into());
        }
        Ok(())
    }

    pub fn mode(&self) -> ProcessingMode {
        if self.paired {
            ProcessingMode::Paired
        } else {
            ProcessingMode::Single
        }
    }
}
