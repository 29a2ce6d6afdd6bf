//! # Step Synth
//!
//! Turns the signals captured while a user performs a task on a computer into
//! an ordered, confidence-scored sequence of human-readable workflow steps.
//!
//! ## Overview
//!
//! Two streams come in, both already materialized by external collaborators:
//! discrete input events (clicks, key presses, scrolls) and periodic visual
//! observations (a frame caption and/or OCR text, each with a timestamp).
//! The library groups events into bursts, pairs every burst with its nearest
//! observation, scores each candidate step from visual, event and temporal
//! evidence, and returns the scored steps together with summary metadata.
//!
//! ## Quick Start
//!
//! ```
//! use step_synth::{Event, Observation, SynthesisConfig, StepSynthesizer};
//!
//! let events = vec![
//!     Event::click(0.0, 120.0, 40.0),
//!     Event::click(0.2, 120.0, 40.0),
//! ];
//! let observations = vec![
//!     Observation::new(0.1)
//!         .with_caption("Settings window open")
//!         .with_ocr_text("General  Privacy  Network"),
//! ];
//!
//! let synthesizer = StepSynthesizer::new(SynthesisConfig::default()).unwrap();
//! let output = synthesizer.synthesize(&events, &observations).unwrap();
//! assert_eq!(output.summary.total_steps, 1);
//! ```
//!
//! ## Architecture
//!
//! - [`capture`]: input types and record ingest
//! - [`chunking`]: burst detection over the event stream
//! - [`semantic`]: observation alignment and step text
//! - [`analysis`]: multi-factor confidence scoring
//! - [`synthesis`]: step orchestration, summary and quality report
//! - [`workflow`]: capture session files
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Events    │───▶│    Burst    │───▶│ Observation │───▶│ Confidence  │
//! │             │    │  Detector   │    │   Aligner   │    │   Scorer    │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                              ▲                  │
//!                                              │                  ▼
//!                                       ┌─────────────┐    ┌─────────────┐
//!                                       │Observations │    │ Scored steps│
//!                                       │             │    │  + summary  │
//!                                       └─────────────┘    └─────────────┘
//! ```

pub mod capture;
pub mod chunking;
pub mod semantic;
pub mod analysis;
pub mod synthesis;
pub mod workflow;
pub mod app;

// Re-export commonly used types
pub use capture::types::{Event, EventKind, Observation};
pub use chunking::burst_detector::{Burst, BurstConfig, EventBurstDetector};
pub use semantic::alignment::{AlignmentConfig, ObservationAligner};
pub use analysis::confidence::{ConfidenceScorer, ScoringConfig, StepScores};
pub use synthesis::step::{Action, CandidateStep, ScoredStep};
pub use synthesis::synthesizer::{StepSynthesizer, SummaryMetadata, SynthesisConfig, SynthesisOutput};
pub use workflow::session::CaptureSession;

/// Result type alias for step synthesis
pub type Result<T> = std::result::Result<T, Error>;

/// Which input stream a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStream {
    /// Input event stream
    Event,
    /// Visual observation stream
    Observation,
}

impl std::fmt::Display for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStream::Event => f.write_str("event"),
            RecordStream::Observation => f.write_str("observation"),
        }
    }
}

/// Error types for step synthesis
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid {stream} record at index {index}: {reason}")]
    InvalidRecord {
        stream: RecordStream,
        index: usize,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an invalid-record error
    pub fn invalid_record(stream: RecordStream, index: usize, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            stream,
            index,
            reason: reason.into(),
        }
    }
}
