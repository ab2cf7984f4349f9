use anyhow::Result;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::pipeline::batch::BatchDriver;
use crate::pipeline::report::PipelineReport;
use crate::samples;
use crate::stages::ShellStageRunner;
use crate::utils::runlog::RunLog;
use crate::workspace::Workspace;

pub fn run(
    input_dir: PathBuf,
    output_dir: PathBuf,
    config_path: PathBuf,
    single: bool,
) -> Result<()> {
    let mut config = PipelineConfig::load(&config_path)?;
    if single {
        config.paired = false;
    }

    let workspace = Workspace::create(&input_dir, &output_dir, config.mode())?;
    let mut log = RunLog::create(&output_dir.join(format!("{}.log", config.run_name)))?;
    log.event("Started setup")?;
    log.event(&format!(
        "Configuration for this analysis is read from: {}",
        config_path.display()
    ))?;

    let samples = samples::discover(&input_dir, &config)?;
    log.sample_list(&samples)?;
    log.event("Finished setup successfully")?;

    let runner = ShellStageRunner::new(&config, &workspace);
    let driver = BatchDriver::new(&runner, &config.thresholds);
    let sample_reports = driver.run(samples, &mut log)?;

    let report = PipelineReport::new(config.run_name.clone(), sample_reports);
    let report_path = output_dir.join(format!("{}.report.json", config.run_name));
    report.write_json(&report_path)?;
    log.event("ALL DONE!")?;

    println!("Report written to {}", report_path.display());
    Ok(())
}
