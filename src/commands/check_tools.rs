use anyhow::Result;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::utils::external_tools::check_tool;

pub fn run(config_path: PathBuf) -> Result<()> {
    let config = PipelineConfig::load(&config_path)?;
    let tools = [
        ("quality reporter", &config.tools.fastqc),
        ("trimmer/filter", &config.tools.prinseq),
        ("read merger", &config.tools.flash),
        ("aligner", &config.tools.malt),
    ];
    for (role, program) in tools {
        check_tool(program)?;
        println!("{role}: {program} OK");
    }
    Ok(())
}
