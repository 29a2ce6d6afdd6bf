//! Observation Alignment
//!
//! Pairs each burst with the visual observation nearest to its start time and
//! turns the result into candidate steps. Matching is nearest-neighbor and
//! non-exclusive: one observation may describe several bursts when it is the
//! nearest for each of them. There is no distance cutoff.

use super::step_text::{describe_burst, describe_observation, infer_action};
use crate::capture::types::Observation;
use crate::chunking::burst_detector::Burst;
use crate::synthesis::step::{Action, CandidateStep};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Configuration for observation alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Emit observations that are nearest to no burst as visual-only steps.
    /// When there are no bursts at all, every observation is emitted regardless.
    pub emit_unmatched_observations: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            emit_unmatched_observations: true,
        }
    }
}

/// Observation aligner
#[derive(Debug, Clone, Default)]
pub struct ObservationAligner {
    /// Configuration
    pub config: AlignmentConfig,
}

impl ObservationAligner {
    /// Create with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: AlignmentConfig) -> Self {
        Self { config }
    }

    /// Align bursts with observations into chronologically ordered candidate steps
    pub fn align(&self, bursts: &[Burst], observations: &[Observation]) -> Vec<CandidateStep> {
        let mut ordered: Vec<&Observation> = observations.iter().collect();
        ordered.sort_by(|a, b| a.t.total_cmp(&b.t));

        let mut matched = vec![false; ordered.len()];
        let mut steps = Vec::with_capacity(bursts.len() + ordered.len());

        for burst in bursts {
            let nearest = nearest_observation(&ordered, burst.start_t);
            if let Some(index) = nearest {
                matched[index] = true;
            }
            steps.push(burst_step(burst, nearest.map(|i| ordered[i])));
        }

        let mut visual_only = 0usize;
        if bursts.is_empty() || self.config.emit_unmatched_observations {
            for (observation, _) in ordered
                .iter()
                .zip(&matched)
                .filter(|(_, is_matched)| !**is_matched)
            {
                steps.push(visual_step(observation));
                visual_only += 1;
            }
        }

        // stable: a burst step precedes a visual-only step at the same time
        steps.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        debug!(
            bursts = bursts.len(),
            observations = ordered.len(),
            matched = matched.iter().filter(|m| **m).count(),
            visual_only,
            "Observation alignment complete"
        );
        steps
    }
}

/// Index of the observation nearest to `target` in a time-ordered slice.
/// Ties go to the earlier observation, and among equal timestamps to the
/// first in input order.
fn nearest_observation(ordered: &[&Observation], target: f64) -> Option<usize> {
    if ordered.is_empty() {
        return None;
    }

    let after = ordered.partition_point(|o| o.t < target);
    let chosen_t = match (after.checked_sub(1), ordered.get(after)) {
        (Some(before), Some(next)) => {
            let before_t = ordered[before].t;
            if next.t - target < target - before_t {
                next.t
            } else {
                before_t
            }
        }
        (Some(before), None) => ordered[before].t,
        (None, Some(next)) => next.t,
        (None, None) => return None,
    };

    Some(ordered.partition_point(|o| o.t < chosen_t))
}

fn burst_step(burst: &Burst, observation: Option<&Observation>) -> CandidateStep {
    let action = infer_action(burst);
    CandidateStep {
        timestamp: burst.start_t,
        duration: burst.span(),
        event_types: burst.distinct_types.clone(),
        event_count: burst.event_count(),
        frame_caption: observation.and_then(|o| o.caption.clone()),
        ocr_text: observation.and_then(|o| o.ocr_text.clone()),
        text: describe_burst(burst, action, observation),
        action,
    }
}

fn visual_step(observation: &Observation) -> CandidateStep {
    CandidateStep {
        timestamp: observation.t,
        duration: 0.0,
        event_types: BTreeSet::new(),
        event_count: 0,
        frame_caption: observation.caption.clone(),
        ocr_text: observation.ocr_text.clone(),
        text: describe_observation(observation),
        action: Action::View,
    }
}

/// Align with the default configuration
pub fn align(bursts: &[Burst], observations: &[Observation]) -> Vec<CandidateStep> {
    ObservationAligner::new().align(bursts, observations)
}
