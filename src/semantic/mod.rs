//! Visual Evidence Alignment
//!
//! Correlates the observation stream with detected bursts and renders the
//! human-readable text of each candidate step.

pub mod alignment;
pub mod step_text;

pub use alignment::{AlignmentConfig, ObservationAligner};
pub use step_text::{describe_burst, describe_observation, infer_action};
