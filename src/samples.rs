use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::pipeline::types::{ProcessingMode, Sample};

const READ_EXTENSIONS: &[&str] = &[".fastq.gz", ".fq.gz", ".fastq", ".fq"];

pub fn is_read_file(name: &str) -> bool {
    !name.starts_with('_') && READ_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Discover sample identifiers from the read files in the input directory.
/// In paired mode the identifier is the file name up to the configured pair
/// tag; in single mode it is the name up to the fastq extension. Discovery
/// order is sorted so reruns process samples identically.
pub fn discover(input_dir: &Path, config: &PipelineConfig) -> Result<Vec<Sample>> {
    let mode = config.mode();
    let mut ids: Vec<String> = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("reading input directory {}", input_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.path().is_file() || !is_read_file(&name) {
            continue;
        }
        let id = sample_id(&name, mode, config)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    ids.sort();
    Ok(ids.into_iter().map(|id| Sample::new(id, mode)).collect())
}

fn sample_id(name: &str, mode: ProcessingMode, config: &PipelineConfig) -> Result<String> {
    match mode {
        ProcessingMode::Paired => {
            for tag in [&config.pair_tag_r1, &config.pair_tag_r2] {
                if let Some(index) = name.find(tag.as_str()) {
                    return Ok(name[..index].to_string());
                }
            }
            bail!("read pair identifiers cannot be detected in {name}");
        }
        ProcessingMode::Single => {
            for ext in [".fastq", ".fq"] {
                if let Some(index) = name.find(ext) {
                    return Ok(name[..index].to_string());
                }
            }
            bail!("{name} does not look like a fastq read file");
        }
    }
}
