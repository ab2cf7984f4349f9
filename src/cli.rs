use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the quality-gated read processing pipeline over a batch of samples
    Run {
        /// Directory holding the raw fastq.gz / fq.gz read files
        input_dir: PathBuf,

        /// Output directory for stage outputs, the run log and the report
        output_dir: PathBuf,

        /// Pipeline configuration file (TOML)
        #[arg(short = 'c', long = "config")]
        config: PathBuf,

        /// Process samples as single-ended regardless of the configuration
        #[arg(long)]
        single: bool,
    },

    /// Verify that the configured external tools resolve on PATH
    CheckTools {
        /// Pipeline configuration file (TOML)
        #[arg(short = 'c', long = "config")]
        config: PathBuf,
    },
}
