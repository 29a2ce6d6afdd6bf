//! Step Description
//!
//! Infers an action label from the events of a burst and renders a short,
//! human-readable description from the best evidence available: the frame
//! caption, an OCR preview, typed characters or pointer coordinates.

use crate::capture::types::{EventKind, Observation};
use crate::chunking::burst_detector::Burst;
use crate::synthesis::step::Action;

/// Maximum OCR preview length in bytes before truncation
const PREVIEW_MAX_BYTES: usize = 80;

/// Infer the action of a burst from its event kinds.
///
/// Pointer movement is incidental when other kinds are present. Clicks and
/// typing together, in either order, are a field fill. Otherwise the most
/// frequent kind wins, ties going to the kind that occurred first.
pub fn infer_action(burst: &Burst) -> Action {
    let significant: Vec<&EventKind> = burst
        .distinct_types
        .iter()
        .filter(|kind| **kind != EventKind::Move)
        .collect();

    match significant.as_slice() {
        [] if burst.distinct_types.is_empty() => Action::Unknown,
        [] => Action::Move,
        [kind] => action_for_kind(kind),
        [EventKind::Click, EventKind::Keyboard] => Action::Fill,
        kinds => dominant_kind(burst, kinds)
            .map(action_for_kind)
            .unwrap_or(Action::Unknown),
    }
}

fn action_for_kind(kind: &EventKind) -> Action {
    match kind {
        EventKind::Click => Action::Click,
        EventKind::Keyboard => Action::Type,
        EventKind::Scroll => Action::Scroll,
        EventKind::Move => Action::Move,
        EventKind::Other(_) => Action::Unknown,
    }
}

fn dominant_kind<'a>(burst: &Burst, kinds: &[&'a EventKind]) -> Option<&'a EventKind> {
    kinds
        .iter()
        .map(|kind| {
            let count = burst.events.iter().filter(|e| &e.kind == *kind).count();
            let first = burst
                .events
                .iter()
                .position(|e| &e.kind == *kind)
                .unwrap_or(usize::MAX);
            (*kind, count, first)
        })
        .max_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
        .map(|(kind, _, _)| kind)
}

/// Characters typed during a burst, if any
pub fn typed_text(burst: &Burst) -> Option<String> {
    let text: String = burst.events.iter().filter_map(|e| e.typed_char()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Describe a step backed by a burst and, optionally, its nearest observation
pub fn describe_burst(burst: &Burst, action: Action, observation: Option<&Observation>) -> String {
    let mut base = action.verb().to_string();
    if matches!(action, Action::Type | Action::Fill) {
        if let Some(typed) = typed_text(burst) {
            base = format!("{} \"{}\"", base, preview(&typed));
        }
    }

    let caption = observation.and_then(|o| non_blank(o.caption.as_deref()));
    let ocr = observation.and_then(|o| non_blank(o.ocr_text.as_deref()));

    if let Some(caption) = caption {
        return format!("{}: {}", base, caption);
    }
    if let Some(ocr) = ocr {
        return format!("{} near \"{}\"", base, preview(ocr));
    }
    if let Some((x, y)) = burst.events.iter().find_map(|e| e.coordinates) {
        return format!("{} at ({:.0}, {:.0})", base, x, y);
    }
    if burst.event_count() > 1 {
        format!("{} ({} events)", base, burst.event_count())
    } else {
        base
    }
}

/// Describe a visual-only step
pub fn describe_observation(observation: &Observation) -> String {
    if let Some(caption) = non_blank(observation.caption.as_deref()) {
        return format!("{}: {}", Action::View.verb(), caption);
    }
    if let Some(ocr) = non_blank(observation.ocr_text.as_deref()) {
        return format!("{} screen showing \"{}\"", Action::View.verb(), preview(ocr));
    }
    format!("{} screen", Action::View.verb())
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Collapse whitespace and truncate long text on a char boundary
fn preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= PREVIEW_MAX_BYTES {
        return collapsed;
    }
    let truncate_at = collapsed
        .char_indices()
        .take_while(|&(i, _)| i <= PREVIEW_MAX_BYTES - 3)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    format!("{}...", &collapsed[..truncate_at])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::Event;
    use crate::chunking::burst_detector::detect_bursts;

    fn burst_of(events: Vec<Event>) -> Burst {
        detect_bursts(&events, 10.0, 1).remove(0)
    }

    #[test]
    fn test_single_kind_actions() {
        let clicks = burst_of(vec![Event::click(0.0, 1.0, 1.0), Event::click(0.1, 1.0, 1.0)]);
        assert_eq!(infer_action(&clicks), Action::Click);

        let keys = burst_of(vec![Event::key_press(0.0, "a")]);
        assert_eq!(infer_action(&keys), Action::Type);

        let scrolls = burst_of(vec![Event::scroll(0.0, 0.0, 2.0)]);
        assert_eq!(infer_action(&scrolls), Action::Scroll);

        let moves = burst_of(vec![Event::new(0.0, EventKind::Move)]);
        assert_eq!(infer_action(&moves), Action::Move);

        let other = burst_of(vec![Event::new(0.0, EventKind::from("pinch"))]);
        assert_eq!(infer_action(&other), Action::Unknown);
    }

    #[test]
    fn test_click_then_type_is_fill() {
        let burst = burst_of(vec![
            Event::new(0.0, EventKind::Move),
            Event::click(0.1, 5.0, 5.0),
            Event::key_press(0.2, "h"),
            Event::key_press(0.3, "i"),
        ]);
        assert_eq!(infer_action(&burst), Action::Fill);
    }

    #[test]
    fn test_type_then_click_is_fill() {
        let burst = burst_of(vec![
            Event::key_press(0.0, "o"),
            Event::key_press(0.1, "k"),
            Event::click(0.2, 5.0, 5.0),
        ]);
        assert_eq!(infer_action(&burst), Action::Fill);
    }

    #[test]
    fn test_dominant_kind_wins() {
        let burst = burst_of(vec![
            Event::scroll(0.0, 0.0, 1.0),
            Event::scroll(0.1, 0.0, 1.0),
            Event::click(0.2, 0.0, 0.0),
            Event::key_press(0.3, "x"),
        ]);
        assert_eq!(infer_action(&burst), Action::Scroll);
    }

    #[test]
    fn test_dominant_tie_goes_to_first() {
        let burst = burst_of(vec![
            Event::key_press(0.0, "x"),
            Event::scroll(0.1, 0.0, 1.0),
            Event::click(0.2, 0.0, 0.0),
        ]);
        assert_eq!(infer_action(&burst), Action::Type);
    }

    #[test]
    fn test_describe_with_caption() {
        let burst = burst_of(vec![Event::click(0.0, 10.0, 20.0)]);
        let obs = Observation::new(0.0).with_caption("  Settings window open ");
        assert_eq!(
            describe_burst(&burst, Action::Click, Some(&obs)),
            "Click: Settings window open"
        );
    }

    #[test]
    fn test_describe_typed_text_with_ocr() {
        let burst = burst_of(vec![
            Event::key_press(0.0, "l"),
            Event::key_press(0.1, "s"),
        ]);
        let obs = Observation::new(0.0).with_ocr_text("$ \n ls");
        assert_eq!(
            describe_burst(&burst, Action::Type, Some(&obs)),
            "Type \"ls\" near \"$ ls\""
        );
    }

    #[test]
    fn test_describe_falls_back_to_coordinates() {
        let burst = burst_of(vec![Event::click(0.0, 120.4, 39.6)]);
        assert_eq!(describe_burst(&burst, Action::Click, None), "Click at (120, 40)");
    }

    #[test]
    fn test_describe_blank_caption_ignored() {
        let burst = burst_of(vec![Event::scroll(0.0, 0.0, 1.0), Event::scroll(0.1, 0.0, 1.0)]);
        let obs = Observation::new(0.0).with_caption("   ");
        assert_eq!(
            describe_burst(&burst, Action::Scroll, Some(&obs)),
            "Scroll (2 events)"
        );
    }

    #[test]
    fn test_describe_observation() {
        let captioned = Observation::new(1.0).with_caption("Terminal open");
        assert_eq!(describe_observation(&captioned), "Observe: Terminal open");

        let ocr_only = Observation::new(1.0).with_ocr_text("File Edit View");
        assert_eq!(
            describe_observation(&ocr_only),
            "Observe screen showing \"File Edit View\""
        );

        assert_eq!(describe_observation(&Observation::new(1.0)), "Observe screen");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(100);
        let short = preview(&long);
        assert!(short.ends_with("..."));
        assert!(short.len() <= PREVIEW_MAX_BYTES + 3);
    }
}
