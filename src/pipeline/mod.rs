pub mod batch;
pub mod breakpoint;
pub mod report;
pub mod sequencer;
pub mod summary;
pub mod types;

pub use batch::BatchDriver;
pub use breakpoint::{evaluate, BreakpointDecision, StageSummaries, Verdict, Violation};
pub use sequencer::{SampleOutcome, SampleSequencer};
pub use summary::QualitySummary;
pub use types::{ProcessingMode, Sample, SampleStatus, Stage};
