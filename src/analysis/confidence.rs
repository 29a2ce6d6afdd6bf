//! Multi-Factor Confidence Scoring
//!
//! Scores a candidate step from visual, event and temporal evidence and
//! combines the three sub-scores with configured weights.
//!
//! ## Weight policy
//!
//! The scorer trusts its caller: `confidence` is the literal weighted sum
//! `visual_weight·visual + event_weight·event + temporal_weight·temporal`.
//! Weights are never renormalized and the result is never clamped. Each
//! weight must lie in [0, 1] (enforced by [`ScoringConfig::validate`]), and
//! callers are responsible for supplying a triple that sums to 1.0. A triple
//! that does not is used as given (with a warning), so confidence may then
//! fall outside [0, 1].
//!
//! The one exception is an evidence-free step (no usable caption, no usable
//! OCR text, no events): its confidence is 0.0 for every weight triple. Its
//! temporal score is still computed, so a first step keeps 1.0.

use crate::synthesis::step::{CandidateStep, ScoredStep};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Credit for a burst with at least one typed event
const EVENT_PRESENCE_CREDIT: f64 = 4.0;
/// Credit for a recognized action category
const EVENT_ACTION_CREDIT: f64 = 3.0;
/// Credit for a single-purpose burst, scaled down by the number of kinds
const EVENT_PURITY_CREDIT: f64 = 3.0;
const EVENT_TOTAL_CREDIT: f64 =
    EVENT_PRESENCE_CREDIT + EVENT_ACTION_CREDIT + EVENT_PURITY_CREDIT;

/// Tolerance when checking that weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration for confidence scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the visual sub-score
    pub visual_weight: f64,
    /// Weight of the event sub-score
    pub event_weight: f64,
    /// Weight of the temporal sub-score
    pub temporal_weight: f64,
    /// Captions shorter than this (in chars, after trimming) count as absent
    pub min_caption_length: usize,
    /// Gap to the previous step (seconds) that earns full temporal credit
    pub reasonable_gap_range: (f64, f64),
    /// Decay slope for gaps below the range, in [0, 1]
    pub short_gap_decay: f64,
    /// Decay slope for gaps above the range, in [0, 1]
    pub long_gap_decay: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            visual_weight: 0.4,
            event_weight: 0.4,
            temporal_weight: 0.2,
            min_caption_length: 3,
            reasonable_gap_range: (0.5, 30.0),
            short_gap_decay: 1.0,
            long_gap_decay: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Validate config values, naming the first invalid field
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, value) in [
            ("visual_weight", self.visual_weight),
            ("event_weight", self.event_weight),
            ("temporal_weight", self.temporal_weight),
            ("short_gap_decay", self.short_gap_decay),
            ("long_gap_decay", self.long_gap_decay),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        let (min_gap, max_gap) = self.reasonable_gap_range;
        if !min_gap.is_finite() || !max_gap.is_finite() || min_gap < 0.0 || max_gap <= 0.0 {
            return Err(crate::Error::Config(format!(
                "reasonable_gap_range bounds must be finite with min >= 0 and max > 0, got ({}, {})",
                min_gap, max_gap
            )));
        }
        if min_gap > max_gap {
            return Err(crate::Error::Config(format!(
                "reasonable_gap_range min must not exceed max, got ({}, {})",
                min_gap, max_gap
            )));
        }
        Ok(())
    }

    /// Sum of the three weights
    pub fn weight_sum(&self) -> f64 {
        self.visual_weight + self.event_weight + self.temporal_weight
    }

    /// Whether the weights sum to 1.0
    pub fn is_normalized(&self) -> bool {
        (self.weight_sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

/// Confidence and the sub-scores that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepScores {
    /// Weighted confidence
    pub confidence: f64,
    /// Visual evidence score
    pub visual_score: f64,
    /// Event evidence score
    pub event_score: f64,
    /// Temporal plausibility score
    pub temporal_score: f64,
}

/// Confidence scorer
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    config: ScoringConfig,
}

impl ConfidenceScorer {
    /// Create a scorer. Weights that do not sum to 1.0 are kept as given.
    pub fn new(config: ScoringConfig) -> Self {
        if !config.is_normalized() {
            warn!(
                weight_sum = config.weight_sum(),
                "Scoring weights do not sum to 1.0; confidence is the raw weighted sum"
            );
        }
        Self { config }
    }

    /// Scoring configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a candidate step given the previously emitted step.
    ///
    /// Never fails. A step with no usable caption, no usable OCR text and no
    /// events is evidence-free: visual and event scores are 0 and confidence
    /// is forced to 0 regardless of the temporal score.
    pub fn score(&self, step: &CandidateStep, previous: Option<&ScoredStep>) -> StepScores {
        let visual_score = self.visual_score(step);
        let event_score = self.event_score(step);
        let temporal_score = self.temporal_score(step, previous);

        let confidence = if self.has_evidence(step) {
            self.config.visual_weight * visual_score
                + self.config.event_weight * event_score
                + self.config.temporal_weight * temporal_score
        } else {
            0.0
        };

        StepScores {
            confidence,
            visual_score,
            event_score,
            temporal_score,
        }
    }

    /// Whether any evidence survives degradation
    pub fn has_evidence(&self, step: &CandidateStep) -> bool {
        step.event_count > 0 || self.visual_score(step) > 0.0
    }

    /// 0.5 for each of caption and OCR text that is present and non-trivial
    pub fn visual_score(&self, step: &CandidateStep) -> f64 {
        let caption = step
            .frame_caption
            .as_deref()
            .map(str::trim)
            .is_some_and(|c| c.chars().count() >= self.config.min_caption_length.max(1));
        let ocr = step
            .ocr_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());

        0.5 * (caption as u8 + ocr as u8) as f64
    }

    /// Event evidence: presence of typed events, a recognized action, and
    /// how single-purpose the burst is
    pub fn event_score(&self, step: &CandidateStep) -> f64 {
        if step.event_count == 0 {
            return 0.0;
        }

        let kinds = step.event_types.len();
        let presence = if kinds > 0 { EVENT_PRESENCE_CREDIT } else { 0.0 };
        let action = if step.action.is_recognized() {
            EVENT_ACTION_CREDIT
        } else {
            0.0
        };
        let purity = if kinds > 0 {
            EVENT_PURITY_CREDIT / kinds as f64
        } else {
            0.0
        };

        (presence + action + purity) / EVENT_TOTAL_CREDIT
    }

    /// 1.0 for the first step; otherwise full credit inside the reasonable
    /// gap range with linear decay on either side
    pub fn temporal_score(&self, step: &CandidateStep, previous: Option<&ScoredStep>) -> f64 {
        let previous = match previous {
            Some(p) => p,
            None => return 1.0,
        };

        let gap = step.timestamp - previous.step.timestamp;
        if !gap.is_finite() || gap < 0.0 {
            return 0.0;
        }

        let (min_gap, max_gap) = self.config.reasonable_gap_range;
        if gap < min_gap {
            let deficit = (min_gap - gap) / min_gap;
            (1.0 - self.config.short_gap_decay * deficit).clamp(0.0, 1.0)
        } else if gap > max_gap {
            let excess = (gap - max_gap) / max_gap;
            (1.0 - self.config.long_gap_decay * excess).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
