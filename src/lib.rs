pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod samples;
pub mod stages;
pub mod utils;
pub mod workspace;

pub use error::PipelineError;
