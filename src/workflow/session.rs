//! Capture Session Files
//!
//! A capture session bundles the event stream and the observation stream of
//! one recorded task together with a little metadata, serialized as JSON.
//! Loading goes through the record ingest so a malformed record is reported
//! with its stream and index.

use crate::capture::ingest::{parse_events, parse_observations};
use crate::capture::types::{Event, Observation};
use crate::synthesis::synthesizer::{StepSynthesizer, SynthesisOutput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

/// Current session format version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// Session metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMetadata {
    /// Unique session ID
    pub id: Uuid,
    /// Session name
    pub name: String,
    /// User-provided goal description
    pub goal: Option<String>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Version of the session format
    pub format_version: String,
}

impl SessionMetadata {
    /// Create new metadata
    pub fn new(name: String, goal: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            goal,
            created_at: Utc::now(),
            format_version: CURRENT_FORMAT_VERSION.to_string(),
        }
    }
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self::new(String::new(), None)
    }
}

/// Events and observations captured for one task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSession {
    /// Session metadata
    pub metadata: SessionMetadata,
    /// Input events
    pub events: Vec<Event>,
    /// Visual observations
    pub observations: Vec<Observation>,
}

impl CaptureSession {
    /// Create an empty session
    pub fn new(name: String, goal: Option<String>) -> Self {
        Self {
            metadata: SessionMetadata::new(name, goal),
            events: Vec::new(),
            observations: Vec::new(),
        }
    }

    /// Add an input event
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Add a visual observation
    pub fn add_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Total number of records in both streams
    pub fn len(&self) -> usize {
        self.events.len() + self.observations.len()
    }

    /// Check if both streams are empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.observations.is_empty()
    }

    /// Time between the earliest and latest record of either stream
    pub fn time_span(&self) -> f64 {
        let times = self
            .events
            .iter()
            .map(|e| e.t)
            .chain(self.observations.iter().map(|o| o.t));
        let (min, max) = times.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
        if min.is_finite() && max.is_finite() {
            max - min
        } else {
            0.0
        }
    }

    /// Run the synthesizer over this session
    pub fn synthesize(&self, synthesizer: &StepSynthesizer) -> crate::Result<SynthesisOutput> {
        synthesizer.synthesize(&self.events, &self.observations)
    }

    /// Save session to a file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load session from a file.
    ///
    /// Logs a warning if the session was saved with an unknown format version,
    /// but still attempts to read it.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let session = Self::from_json_str(&content)?;
        if session.metadata.format_version != CURRENT_FORMAT_VERSION {
            tracing::warn!(
                name = %session.metadata.name,
                found = %session.metadata.format_version,
                expected = CURRENT_FORMAT_VERSION,
                "Session has different format version; some fields may use default values"
            );
        }
        Ok(session)
    }

    /// Parse a session from JSON text, validating every record
    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        let fields = root
            .as_object()
            .ok_or_else(|| shape_error("session must be a JSON object"))?;

        let metadata = match fields.get("metadata") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => SessionMetadata::default(),
        };
        let events = parse_events(records(fields.get("events"), "events")?)?;
        let observations = parse_observations(records(fields.get("observations"), "observations")?)?;

        Ok(Self {
            metadata,
            events,
            observations,
        })
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new("untitled".to_string(), None)
    }
}

fn records<'a>(value: Option<&'a Value>, name: &str) -> crate::Result<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(shape_error(&format!("`{}` must be an array", name))),
    }
}

fn shape_error(message: &str) -> crate::Error {
    crate::Error::Serialization(<serde_json::Error as serde::de::Error>::custom(message))
}
