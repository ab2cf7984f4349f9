use std::fs;
use std::path::Path;

use ribogate::config::PipelineConfig;
use ribogate::pipeline::ProcessingMode;
use ribogate::{samples, PipelineError};

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("pipeline.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn empty_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");

    let config = PipelineConfig::load(&path).unwrap();
    assert!(config.paired);
    assert_eq!(config.pair_tag_r1, ".1.");
    assert_eq!(config.thresholds.raw_absolute_min, 10_000);
    assert_eq!(config.thresholds.filtered_absolute_min, 4_000);
    assert_eq!(config.filter.min_length, 75);
    assert_eq!(config.tools.prinseq, "prinseq++");
}

#[test]
fn out_of_range_loss_threshold_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[thresholds]\nraw_to_trimmed_max_loss = 1.5\n",
    );

    let err = PipelineConfig::load(&path).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::InvalidConfig(message)) => {
            assert!(message.contains("raw_to_trimmed_max_loss"));
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn unknown_keys_surface_one_structured_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[thresholds]\nraw_minimum = 10\n");

    let err = PipelineConfig::load(&path).unwrap_err();
    assert!(err.downcast_ref::<PipelineError>().is_some());
}

#[test]
fn paired_discovery_groups_both_read_files_under_one_id() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "s1.1.fastq.gz",
        "s1.2.fastq.gz",
        "s2.1.fq.gz",
        "s2.2.fq.gz",
        "_discarded.1.fastq.gz",
        "notes.txt",
    ] {
        fs::write(dir.path().join(name), b"@r\nACGT\n+\nIIII\n").unwrap();
    }
    let config = PipelineConfig::default();

    let found = samples::discover(dir.path(), &config).unwrap();
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
    assert!(found.iter().all(|s| s.mode == ProcessingMode::Paired));
}

#[test]
fn single_mode_discovery_uses_the_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["alpha.fastq.gz", "beta.fq"] {
        fs::write(dir.path().join(name), b"@r\nACGT\n+\nIIII\n").unwrap();
    }
    let config = PipelineConfig {
        paired: false,
        ..PipelineConfig::default()
    };

    let found = samples::discover(dir.path(), &config).unwrap();
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "beta"]);
    assert!(found.iter().all(|s| s.mode == ProcessingMode::Single));
}

#[test]
fn unrecognized_pair_tag_is_an_error_in_paired_mode() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("odd_sample.fastq.gz"), b"@r\nA\n+\nI\n").unwrap();
    let config = PipelineConfig::default();

    assert!(samples::discover(dir.path(), &config).is_err());
}
