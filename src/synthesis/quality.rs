//! Step Quality Report
//!
//! Flags synthesized steps that downstream document generation should treat
//! with care: low confidence, missing visual or event evidence, and actions we
//! could not classify.

use super::step::{Action, ScoredStep};
use super::synthesizer::SynthesisOutput;
use serde::Serialize;

/// Kinds of quality findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueType {
    /// Confidence below the configured floor
    LowConfidence,
    /// Step built from an observation with no input events
    VisualOnly,
    /// Step built from events with no observation
    EventOnly,
    /// Event kinds could not be mapped to an action
    UnknownAction,
}

/// A single finding about one step
#[derive(Debug, Clone, Serialize)]
pub struct QualityIssue {
    /// Finding type
    pub issue_type: QualityIssueType,
    /// Index of the step in the output
    pub step_index: usize,
    /// Human-readable message
    pub message: String,
}

/// Quality report over a synthesis output
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    /// True when no step is below the confidence floor
    pub passed: bool,
    /// Confidence floor used
    pub min_confidence: f64,
    /// Low-confidence findings
    pub errors: Vec<QualityIssue>,
    /// Informational findings
    pub warnings: Vec<QualityIssue>,
}

impl QualityReport {
    /// Number of findings of one type
    pub fn count(&self, issue_type: QualityIssueType) -> usize {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(|i| i.issue_type == issue_type)
            .count()
    }
}

/// Quality checker
#[derive(Debug, Clone)]
pub struct QualityChecker {
    min_confidence: f64,
}

impl QualityChecker {
    /// Create a checker with a confidence floor
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Check every step of an output
    pub fn check(&self, output: &SynthesisOutput) -> QualityReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (index, step) in output.steps.iter().enumerate() {
            if step.confidence < self.min_confidence {
                errors.push(issue(
                    QualityIssueType::LowConfidence,
                    index,
                    format!(
                        "confidence {:.2} below {:.2}: {}",
                        step.confidence, self.min_confidence, step.step.text
                    ),
                ));
            }
            warnings.extend(self.check_evidence(index, step));
        }

        QualityReport {
            passed: errors.is_empty(),
            min_confidence: self.min_confidence,
            errors,
            warnings,
        }
    }

    fn check_evidence(&self, index: usize, step: &ScoredStep) -> Vec<QualityIssue> {
        let mut found = Vec::new();
        if !step.step.has_events() {
            found.push(issue(
                QualityIssueType::VisualOnly,
                index,
                "no input events near this observation".to_string(),
            ));
        } else if !step.step.has_visual() {
            found.push(issue(
                QualityIssueType::EventOnly,
                index,
                "no observation available for this burst".to_string(),
            ));
        }
        if step.step.action == Action::Unknown {
            let kinds: Vec<&str> = step.step.event_types.iter().map(|k| k.as_str()).collect();
            found.push(issue(
                QualityIssueType::UnknownAction,
                index,
                format!("unclassified event types: {}", kinds.join(", ")),
            ));
        }
        found
    }
}

fn issue(issue_type: QualityIssueType, step_index: usize, message: String) -> QualityIssue {
    QualityIssue {
        issue_type,
        step_index,
        message,
    }
}
