//! Core types for captured signals
//!
//! Defines the two input streams consumed by the synthesis pipeline: discrete
//! input events and timestamped visual observations. Both are produced by
//! external collaborators (event capture, vision/OCR) and are read-only here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of input event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// Mouse button press/release
    Click,
    /// Key press/release
    Keyboard,
    /// Wheel or trackpad scroll
    Scroll,
    /// Pointer movement (includes drag)
    Move,
    /// Anything the capture layer reported that we do not classify
    Other(String),
}

impl EventKind {
    /// Canonical label used in serialized output
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::Keyboard => "keyboard",
            EventKind::Scroll => "scroll",
            EventKind::Move => "move",
            EventKind::Other(label) => label.as_str(),
        }
    }

    /// Check if this is a click event
    pub fn is_click(&self) -> bool {
        matches!(self, EventKind::Click)
    }

    /// Check if this is a keyboard event
    pub fn is_keyboard(&self) -> bool {
        matches!(self, EventKind::Keyboard)
    }

    /// Check if the capture layer reported a type we know
    pub fn is_known(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "click" | "mouse_down" | "mousedown" | "mouse_up" | "mouseup" | "left_click"
            | "right_click" | "double_click" => EventKind::Click,
            "keyboard" | "key" | "key_down" | "keydown" | "key_up" | "keyup" | "keypress" => {
                EventKind::Keyboard
            }
            "scroll" | "wheel" | "scroll_wheel" => EventKind::Scroll,
            "move" | "mouse_move" | "mousemove" | "drag" => EventKind::Move,
            _ => EventKind::Other(value),
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        EventKind::from(value.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic input action reported by the event capture layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Seconds since the start of the capture
    pub t: f64,
    /// Event type
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Pointer position (screen coordinates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f64, f64)>,
    /// Mouse button name (left, right, middle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
    /// Key name or typed character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Press (true) or release (false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressed: Option<bool>,
    /// Scroll delta (dx, dy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_delta: Option<(f64, f64)>,
}

impl Event {
    /// Create an event with no payload
    pub fn new(t: f64, kind: EventKind) -> Self {
        Self {
            t,
            kind,
            coordinates: None,
            button: None,
            key: None,
            pressed: None,
            scroll_delta: None,
        }
    }

    /// Create a click at a screen position
    pub fn click(t: f64, x: f64, y: f64) -> Self {
        Self {
            coordinates: Some((x, y)),
            button: Some("left".to_string()),
            pressed: Some(true),
            ..Self::new(t, EventKind::Click)
        }
    }

    /// Create a key press
    pub fn key_press(t: f64, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            pressed: Some(true),
            ..Self::new(t, EventKind::Keyboard)
        }
    }

    /// Create a scroll event
    pub fn scroll(t: f64, dx: f64, dy: f64) -> Self {
        Self {
            scroll_delta: Some((dx, dy)),
            ..Self::new(t, EventKind::Scroll)
        }
    }

    /// Whether this is a key press that produced a printable character
    pub fn typed_char(&self) -> Option<char> {
        if !self.kind.is_keyboard() || self.pressed == Some(false) {
            return None;
        }
        let key = self.key.as_deref()?;
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ if key.eq_ignore_ascii_case("space") => Some(' '),
            _ => None,
        }
    }
}

/// A visual sample of the screen at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Seconds since the start of the capture
    pub t: f64,
    /// Frame caption from the vision model
    #[serde(default)]
    pub caption: Option<String>,
    /// Text extracted by OCR
    #[serde(default)]
    pub ocr_text: Option<String>,
}

impl Observation {
    /// Create an observation with no visual content
    pub fn new(t: f64) -> Self {
        Self {
            t,
            caption: None,
            ocr_text: None,
        }
    }

    /// Attach a caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Attach OCR text
    pub fn with_ocr_text(mut self, ocr_text: impl Into<String>) -> Self {
        self.ocr_text = Some(ocr_text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_aliases() {
        assert_eq!(EventKind::from("click"), EventKind::Click);
        assert_eq!(EventKind::from("KeyDown"), EventKind::Keyboard);
        assert_eq!(EventKind::from("wheel"), EventKind::Scroll);
        assert_eq!(EventKind::from("mouse_move"), EventKind::Move);
        assert_eq!(
            EventKind::from("gesture"),
            EventKind::Other("gesture".to_string())
        );
    }

    #[test]
    fn test_event_kind_serializes_as_label() {
        let json = serde_json::to_string(&EventKind::Keyboard).unwrap();
        assert_eq!(json, "\"keyboard\"");

        let other: EventKind = serde_json::from_str("\"pinch\"").unwrap();
        assert_eq!(other.as_str(), "pinch");
        assert!(!other.is_known());
    }

    #[test]
    fn test_event_deserialize_minimal() {
        let event: Event = serde_json::from_str(r#"{"t": 1.5, "type": "click"}"#).unwrap();
        assert_eq!(event.t, 1.5);
        assert!(event.kind.is_click());
        assert!(event.coordinates.is_none());
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(Event::key_press(0.0, "a").typed_char(), Some('a'));
        assert_eq!(Event::key_press(0.0, "space").typed_char(), Some(' '));
        assert_eq!(Event::key_press(0.0, "Return").typed_char(), None);

        let mut release = Event::key_press(0.0, "a");
        release.pressed = Some(false);
        assert_eq!(release.typed_char(), None);

        assert_eq!(Event::click(0.0, 1.0, 2.0).typed_char(), None);
    }

    #[test]
    fn test_observation_absent_vs_empty() {
        let absent: Observation = serde_json::from_str(r#"{"t": 2.0}"#).unwrap();
        assert!(absent.caption.is_none());

        let empty: Observation = serde_json::from_str(r#"{"t": 2.0, "caption": ""}"#).unwrap();
        assert_eq!(empty.caption.as_deref(), Some(""));

        let null: Observation =
            serde_json::from_str(r#"{"t": 2.0, "ocr_text": null}"#).unwrap();
        assert!(null.ocr_text.is_none());
    }
}
