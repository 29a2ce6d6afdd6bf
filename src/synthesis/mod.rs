//! Step Synthesis & Quality
//!
//! Turns aligned candidates into the final scored step sequence and reports
//! on its quality.

pub mod step;
pub mod synthesizer;
pub mod quality;

pub use step::{Action, CandidateStep, ScoredStep};
pub use synthesizer::{synthesize, StepSynthesizer, SummaryMetadata, SynthesisConfig, SynthesisOutput};
pub use quality::{QualityChecker, QualityIssue, QualityIssueType, QualityReport};
