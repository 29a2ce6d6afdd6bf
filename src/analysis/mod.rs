//! Step confidence analysis
//!
//! Scores candidate steps from three independent kinds of evidence:
//! - Visual: caption and OCR text of the paired observation
//! - Event: the burst backing the step and its inferred action
//! - Temporal: plausibility of the gap to the previous step

pub mod confidence;

pub use confidence::{ConfidenceScorer, ScoringConfig, StepScores};
