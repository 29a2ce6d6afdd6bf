//! Record Ingest
//!
//! Converts loosely typed JSON records from the capture collaborators into
//! [`Event`] and [`Observation`] values. The timestamp `t` is the only field
//! that is enforced: a record without a finite numeric `t` is rejected with its
//! index. Every other field degrades to "absent" when missing or mistyped.

use super::types::{Event, EventKind, Observation};
use crate::{Error, RecordStream, Result};
use serde_json::{Map, Value};

/// Parse an event stream from JSON records
pub fn parse_events(records: &[Value]) -> Result<Vec<Event>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_event(index, record))
        .collect()
}

/// Parse an observation stream from JSON records
pub fn parse_observations(records: &[Value]) -> Result<Vec<Observation>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_observation(index, record))
        .collect()
}

/// Check that every event carries a finite timestamp
pub fn validate_events(events: &[Event]) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        if !event.t.is_finite() {
            return Err(Error::invalid_record(
                RecordStream::Event,
                index,
                format!("timestamp `t` must be finite, got {}", event.t),
            ));
        }
    }
    Ok(())
}

/// Check that every observation carries a finite timestamp
pub fn validate_observations(observations: &[Observation]) -> Result<()> {
    for (index, observation) in observations.iter().enumerate() {
        if !observation.t.is_finite() {
            return Err(Error::invalid_record(
                RecordStream::Observation,
                index,
                format!("timestamp `t` must be finite, got {}", observation.t),
            ));
        }
    }
    Ok(())
}

fn parse_event(index: usize, record: &Value) -> Result<Event> {
    let fields = as_object(RecordStream::Event, index, record)?;
    let t = required_timestamp(RecordStream::Event, index, fields)?;

    let kind = fields
        .get("type")
        .and_then(Value::as_str)
        .map(EventKind::from)
        .unwrap_or_else(|| EventKind::Other("unknown".to_string()));

    let coordinates = number_pair(fields.get("coordinates")).or_else(|| {
        match (
            fields.get("x").and_then(Value::as_f64),
            fields.get("y").and_then(Value::as_f64),
        ) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    });

    Ok(Event {
        t,
        kind,
        coordinates,
        button: string_field(fields, "button"),
        key: string_field(fields, "key"),
        pressed: fields.get("pressed").and_then(Value::as_bool),
        scroll_delta: number_pair(fields.get("scroll_delta")),
    })
}

fn parse_observation(index: usize, record: &Value) -> Result<Observation> {
    let fields = as_object(RecordStream::Observation, index, record)?;
    let t = required_timestamp(RecordStream::Observation, index, fields)?;

    Ok(Observation {
        t,
        caption: string_field(fields, "caption"),
        ocr_text: string_field(fields, "ocr_text"),
    })
}

fn as_object<'a>(
    stream: RecordStream,
    index: usize,
    record: &'a Value,
) -> Result<&'a Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| Error::invalid_record(stream, index, "record is not a JSON object"))
}

fn required_timestamp(stream: RecordStream, index: usize, fields: &Map<String, Value>) -> Result<f64> {
    match fields.get("t") {
        None | Some(Value::Null) => Err(Error::invalid_record(
            stream,
            index,
            "missing timestamp `t`",
        )),
        Some(value) => match value.as_f64() {
            Some(t) if t.is_finite() => Ok(t),
            _ => Err(Error::invalid_record(
                stream,
                index,
                format!("timestamp `t` is not a number: {}", value),
            )),
        },
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(String::from)
}

fn number_pair(value: Option<&Value>) -> Option<(f64, f64)> {
    match value?.as_array()?.as_slice() {
        [a, b] => Some((a.as_f64()?, b.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events_with_payloads() {
        let records = vec![
            json!({"t": 0.0, "type": "click", "x": 10.0, "y": 20.0, "button": "left"}),
            json!({"t": 0.5, "type": "keyboard", "key": "a", "pressed": true}),
            json!({"t": 1.0, "type": "scroll", "scroll_delta": [0.0, -3.0]}),
        ];

        let events = parse_events(&records).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].coordinates, Some((10.0, 20.0)));
        assert_eq!(events[0].button.as_deref(), Some("left"));
        assert_eq!(events[1].key.as_deref(), Some("a"));
        assert_eq!(events[1].pressed, Some(true));
        assert_eq!(events[2].scroll_delta, Some((0.0, -3.0)));
    }

    #[test]
    fn test_missing_timestamp_reports_index() {
        let records = vec![
            json!({"t": 0.0, "type": "click"}),
            json!({"type": "click"}),
        ];

        match parse_events(&records) {
            Err(Error::InvalidRecord { stream, index, .. }) => {
                assert_eq!(stream, RecordStream::Event);
                assert_eq!(index, 1);
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_timestamp_rejected() {
        let records = vec![json!({"t": "soon", "caption": "Desktop"})];

        match parse_observations(&records) {
            Err(Error::InvalidRecord { stream, index, reason }) => {
                assert_eq!(stream, RecordStream::Observation);
                assert_eq!(index, 0);
                assert!(reason.contains("not a number"));
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_record_rejected() {
        let records = vec![json!([1, 2, 3])];
        assert!(parse_events(&records).is_err());
    }

    #[test]
    fn test_mistyped_optional_fields_degrade() {
        let records = vec![json!({"t": 3.0, "caption": 42, "ocr_text": null})];

        let observations = parse_observations(&records).unwrap();
        assert!(observations[0].caption.is_none());
        assert!(observations[0].ocr_text.is_none());
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let events = parse_events(&[json!({"t": 1.0})]).unwrap();
        assert_eq!(events[0].kind, EventKind::Other("unknown".to_string()));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let events = vec![Event::click(0.0, 0.0, 0.0), Event::click(f64::NAN, 0.0, 0.0)];
        match validate_events(&events) {
            Err(Error::InvalidRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }

        let observations = vec![Observation::new(f64::INFINITY)];
        assert!(validate_observations(&observations).is_err());
    }
}
