//! Captured signal types
//!
//! Input events and visual observations as delivered by the capture and
//! vision collaborators, plus the record ingest that validates them.

pub mod types;
pub mod ingest;

pub use types::*;
pub use ingest::{parse_events, parse_observations, validate_events, validate_observations};
