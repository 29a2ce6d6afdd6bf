//! Step Synthesis
//!
//! Orchestrates burst detection, observation alignment and confidence scoring
//! into the final ordered list of scored steps plus summary metadata.
//!
//! Every call is independent: the synthesizer holds only its immutable
//! configuration, so one instance can serve concurrent callers.

use crate::analysis::confidence::{ConfidenceScorer, ScoringConfig};
use crate::capture::ingest::{validate_events, validate_observations};
use crate::capture::types::{Event, Observation};
use crate::chunking::burst_detector::{BurstConfig, EventBurstDetector};
use crate::semantic::alignment::{AlignmentConfig, ObservationAligner};
use crate::synthesis::step::{CandidateStep, ScoredStep};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Complete configuration of the synthesis pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Burst detection settings
    pub bursts: BurstConfig,
    /// Observation alignment settings
    pub alignment: AlignmentConfig,
    /// Confidence scoring settings
    pub scoring: ScoringConfig,
}

impl SynthesisConfig {
    /// Validate all sections, naming the first invalid field
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.bursts.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}

/// Aggregate metadata over the emitted steps
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// Number of emitted steps
    pub total_steps: usize,
    /// Seconds from the first step to the end of the last (0 with fewer than 2 steps)
    pub total_duration: f64,
    /// Mean confidence (0 with no steps)
    pub average_confidence: f64,
}

impl SummaryMetadata {
    /// Summarize a chronologically ordered step list
    pub fn from_steps(steps: &[ScoredStep]) -> Self {
        let total_duration = match (steps.first(), steps.last()) {
            (Some(first), Some(last)) if steps.len() >= 2 => last.end_time() - first.timestamp(),
            _ => 0.0,
        };
        let average_confidence = if steps.is_empty() {
            0.0
        } else {
            steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64
        };

        Self {
            total_steps: steps.len(),
            total_duration,
            average_confidence,
        }
    }
}

/// Ordered scored steps plus summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SynthesisOutput {
    /// Steps sorted by timestamp, non-decreasing
    pub steps: Vec<ScoredStep>,
    /// Aggregate metadata
    pub summary: SummaryMetadata,
}

/// Step synthesizer
#[derive(Debug, Clone)]
pub struct StepSynthesizer {
    config: SynthesisConfig,
    detector: EventBurstDetector,
    aligner: ObservationAligner,
    scorer: ConfidenceScorer,
}

impl StepSynthesizer {
    /// Create a synthesizer, rejecting invalid configuration up front
    pub fn new(config: SynthesisConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: EventBurstDetector::with_config(config.bursts.clone()),
            aligner: ObservationAligner::with_config(config.alignment.clone()),
            scorer: ConfidenceScorer::new(config.scoring.clone()),
            config,
        })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Turn an event stream and an observation stream into scored steps.
    ///
    /// Fails only when a record carries a non-finite timestamp. When every
    /// event is discarded as noise, the result is built from the observations
    /// alone.
    pub fn synthesize(
        &self,
        events: &[Event],
        observations: &[Observation],
    ) -> crate::Result<SynthesisOutput> {
        validate_events(events)?;
        validate_observations(observations)?;

        let bursts = self.detector.detect(events);
        if bursts.is_empty() && !events.is_empty() {
            info!(
                events = events.len(),
                "No event bursts detected, falling back to vision-only analysis"
            );
        }

        let mut candidates = self.aligner.align(&bursts, observations);
        if ensure_chronological(&mut candidates) {
            warn!("Aligned candidates out of chronological order, re-sorted");
        }

        let evidence_free = candidates
            .iter()
            .filter(|c| !self.scorer.has_evidence(c))
            .count();
        if evidence_free > 0 {
            debug!(evidence_free, "Candidates without usable evidence scored 0");
        }

        let mut steps: Vec<ScoredStep> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let scores = self.scorer.score(&candidate, steps.last());
            steps.push(ScoredStep {
                step: candidate,
                confidence: scores.confidence,
                visual_score: scores.visual_score,
                event_score: scores.event_score,
                temporal_score: scores.temporal_score,
            });
        }

        let summary = SummaryMetadata::from_steps(&steps);
        info!(
            steps = summary.total_steps,
            duration = summary.total_duration,
            average_confidence = summary.average_confidence,
            "Step synthesis complete"
        );

        Ok(SynthesisOutput { steps, summary })
    }
}

/// Stably sort candidates by timestamp if they are out of order.
/// Returns whether a sort was needed.
fn ensure_chronological(candidates: &mut [CandidateStep]) -> bool {
    if candidates
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    {
        return false;
    }
    candidates.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    true
}

/// Validate the configuration, then synthesize
pub fn synthesize(
    events: &[Event],
    observations: &[Observation],
    config: &SynthesisConfig,
) -> crate::Result<SynthesisOutput> {
    StepSynthesizer::new(config.clone())?.synthesize(events, observations)
}
