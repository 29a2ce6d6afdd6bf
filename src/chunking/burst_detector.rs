//! Event Burst Detection
//!
//! Groups individually noisy input events into bursts: maximal runs of events
//! whose consecutive gaps stay within a threshold. Runs that are too short to
//! be a deliberate interaction are discarded as noise, never merged into a
//! neighboring burst.

use crate::capture::types::{Event, EventKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A temporally dense run of input events
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    /// Events in chronological order (never empty)
    pub events: Vec<Event>,
    /// Timestamp of the first event
    pub start_t: f64,
    /// Timestamp of the last event
    pub end_t: f64,
    /// Distinct event kinds in this burst
    pub distinct_types: BTreeSet<EventKind>,
}

impl Burst {
    /// Build a burst from a chronologically ordered, non-empty group
    fn from_events(events: Vec<Event>) -> Option<Self> {
        let start_t = events.first()?.t;
        let end_t = events.last()?.t;
        let distinct_types = events.iter().map(|e| e.kind.clone()).collect();
        Some(Self {
            events,
            start_t,
            end_t,
            distinct_types,
        })
    }

    /// Number of events in the burst
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Time covered by the burst in seconds
    pub fn span(&self) -> f64 {
        self.end_t - self.start_t
    }

    /// Whether all events share one kind
    pub fn is_single_purpose(&self) -> bool {
        self.distinct_types.len() == 1
    }
}

/// Configuration for burst detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Maximum gap between consecutive events of one burst (seconds)
    pub burst_threshold: f64,
    /// Minimum events for a burst to be kept
    pub burst_min_events: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            burst_threshold: 1.0,
            burst_min_events: 2,
        }
    }
}

impl BurstConfig {
    /// Validate config values, naming the first invalid field
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.burst_threshold.is_finite() || self.burst_threshold <= 0.0 {
            return Err(crate::Error::Config(format!(
                "burst_threshold must be > 0, got {}",
                self.burst_threshold
            )));
        }
        if self.burst_min_events == 0 {
            return Err(crate::Error::Config(
                "burst_min_events must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Burst detector
#[derive(Debug, Clone, Default)]
pub struct EventBurstDetector {
    /// Configuration
    pub config: BurstConfig,
}

impl EventBurstDetector {
    /// Create with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: BurstConfig) -> Self {
        Self { config }
    }

    /// Detect bursts in an event stream.
    ///
    /// Events need not be sorted; they are stably ordered by `t` first, so
    /// events sharing a timestamp keep their input order. The result is
    /// ordered by `start_t` and bursts never overlap.
    pub fn detect(&self, events: &[Event]) -> Vec<Burst> {
        let mut ordered: Vec<&Event> = events.iter().collect();
        if !ordered.windows(2).all(|pair| pair[0].t <= pair[1].t) {
            ordered.sort_by(|a, b| a.t.total_cmp(&b.t));
        }

        let mut bursts = Vec::new();
        let mut noise_events = 0usize;
        let mut group: Vec<Event> = Vec::new();

        for event in ordered {
            if let Some(last) = group.last() {
                if event.t - last.t > self.config.burst_threshold {
                    noise_events += self.close_group(std::mem::take(&mut group), &mut bursts);
                }
            }
            group.push(event.clone());
        }
        noise_events += self.close_group(group, &mut bursts);

        debug!(
            bursts = bursts.len(),
            noise_events,
            "Burst detection complete"
        );
        bursts
    }

    /// Emit a closed group as a burst if it is long enough.
    /// Returns the number of events discarded as noise.
    fn close_group(&self, group: Vec<Event>, bursts: &mut Vec<Burst>) -> usize {
        if group.len() < self.config.burst_min_events {
            return group.len();
        }
        if let Some(burst) = Burst::from_events(group) {
            bursts.push(burst);
        }
        0
    }
}

/// Detect bursts with explicit parameters
pub fn detect_bursts(events: &[Event], burst_threshold: f64, burst_min_events: usize) -> Vec<Burst> {
    EventBurstDetector::with_config(BurstConfig {
        burst_threshold,
        burst_min_events,
    })
    .detect(events)
}
