//! Step records
//!
//! The provisional [`CandidateStep`] built by alignment and the immutable
//! [`ScoredStep`] emitted by the synthesizer.

use crate::capture::types::EventKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inferred action category of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Mouse click(s)
    Click,
    /// Typing or keyboard shortcuts
    Type,
    /// Scrolling content
    Scroll,
    /// Pointer movement or drag
    Move,
    /// Click followed by typing (filling a field)
    Fill,
    /// Screen observed with no input
    View,
    /// Event types we cannot classify
    Unknown,
}

impl Action {
    /// Whether this is a recognized interaction category
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Action::Unknown)
    }

    /// Imperative verb used in step text
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Click => "Click",
            Action::Type => "Type",
            Action::Scroll => "Scroll",
            Action::Move => "Move pointer",
            Action::Fill => "Click and type",
            Action::View => "Observe",
            Action::Unknown => "Interact",
        }
    }

    /// Label used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Type => "type",
            Action::Scroll => "scroll",
            Action::Move => "move",
            Action::Fill => "fill",
            Action::View => "view",
            Action::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provisional, unscored step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStep {
    /// Anchor time: burst start or observation time
    pub timestamp: f64,
    /// Burst span in seconds (0 for visual-only steps)
    pub duration: f64,
    /// Distinct event kinds backing this step
    pub event_types: BTreeSet<EventKind>,
    /// Number of events backing this step
    pub event_count: usize,
    /// Caption of the paired observation
    pub frame_caption: Option<String>,
    /// OCR text of the paired observation
    pub ocr_text: Option<String>,
    /// Human-readable description
    pub text: String,
    /// Inferred action
    pub action: Action,
}

impl CandidateStep {
    /// Whether the step is backed by input events
    pub fn has_events(&self) -> bool {
        self.event_count > 0
    }

    /// Whether the step carries any visual content
    pub fn has_visual(&self) -> bool {
        self.frame_caption.is_some() || self.ocr_text.is_some()
    }
}

/// A candidate step with its confidence and sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredStep {
    /// The underlying step
    #[serde(flatten)]
    pub step: CandidateStep,
    /// Weighted confidence
    pub confidence: f64,
    /// Visual evidence score in [0, 1]
    pub visual_score: f64,
    /// Event evidence score in [0, 1]
    pub event_score: f64,
    /// Temporal plausibility score in [0, 1]
    pub temporal_score: f64,
}

impl ScoredStep {
    /// Anchor time of the step
    pub fn timestamp(&self) -> f64 {
        self.step.timestamp
    }

    /// End of the step (timestamp plus duration)
    pub fn end_time(&self) -> f64 {
        self.step.timestamp + self.step.duration
    }
}
