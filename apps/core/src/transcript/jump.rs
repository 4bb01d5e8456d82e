//! Jump events: DECISION lines whose preceding window shows no explicit
//! reason, comparison or objection marker.
//!
//! An event does not claim the reasoning never happened, only that it is not
//! connected to the decision in the recorded text.

use serde::{Deserialize, Serialize};

use super::lines::Line;
use super::links::{Link, LinkSet};

/// Window used when the caller does not choose one.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// A line shown as context for a jump event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLine {
    pub id: String,
    pub index: usize,
    pub text: String,
}

impl From<&Line> for ContextLine {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            index: line.index,
            text: line.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpEvent {
    pub decision_index: usize,
    pub decision_id: String,
    pub decision_text: String,
    /// Absent link kinds, always in REASON, COMPARE, OBJECTION order
    pub missing: Vec<Link>,
    /// Preceding window, oldest first
    pub context: Vec<ContextLine>,
}

impl JumpEvent {
    pub fn is_missing(&self, link: Link) -> bool {
        self.missing.contains(&link)
    }
}

/// Build one event per DECISION line whose window lacks at least one link kind.
///
/// The window is the `window_size` lines right before the decision, fewer near
/// the start of the transcript. A `window_size` of 0 yields an empty window.
pub fn build_jump_events(lines: &[Line], window_size: usize) -> Vec<JumpEvent> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_decision())
        .filter_map(|(position, line)| {
            let window = &lines[position.saturating_sub(window_size)..position];

            let present: LinkSet = window
                .iter()
                .flat_map(|ctx| ctx.links.iter().copied())
                .collect();

            let missing: Vec<Link> = Link::ALL
                .into_iter()
                .filter(|link| !present.contains(link))
                .collect();

            if missing.is_empty() {
                return None;
            }

            Some(JumpEvent {
                decision_index: line.index,
                decision_id: line.id.clone(),
                decision_text: line.text.clone(),
                missing,
                context: window.iter().map(ContextLine::from).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::lines::analyze_lines;
    use crate::transcript::role::Role;

    #[test]
    fn test_decision_after_plain_consensus_misses_everything() {
        let lines = analyze_lines(&["賛成", "これで決定"]);
        assert_eq!(lines[0].role(), Role::Consensus);
        assert!(lines[0].links.is_empty());

        let events = build_jump_events(&lines, 3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].decision_id, "L2");
        assert_eq!(events[0].missing, Link::ALL.to_vec());
        assert_eq!(events[0].context.len(), 1);
        assert_eq!(events[0].context[0].text, "賛成");
    }

    #[test]
    fn test_window_union_suppresses_event() {
        let lines = analyze_lines(&[
            "なので費用を抑えたい",
            "雑談",
            "A案よりB案",
            "しかし懸念もある",
            "B案で確定",
        ]);
        assert!(lines[1].links.is_empty());

        // window of 3 covers L2..L4, which lacks REASON
        let events = build_jump_events(&lines, 3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].missing, vec![Link::Reason]);

        // window of 4 reaches L1 and the union is complete
        assert!(build_jump_events(&lines, 4).is_empty());
    }

    #[test]
    fn test_first_line_decision_has_empty_context() {
        let lines = analyze_lines(&["これで決定", "なので賛成"]);
        let events = build_jump_events(&lines, 3);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].decision_index, 0);
        assert!(events[0].context.is_empty());
        assert_eq!(events[0].missing, Link::ALL.to_vec());
    }

    #[test]
    fn test_window_larger_than_transcript() {
        let lines = analyze_lines(&["なので", "これで決定"]);
        let events = build_jump_events(&lines, 100);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].missing, vec![Link::Compare, Link::Objection]);
        assert_eq!(events[0].context.len(), 1);
    }

    #[test]
    fn test_only_decision_lines_produce_events() {
        let lines = analyze_lines(&["賛成", "次回確認する", "雑談"]);
        assert!(build_jump_events(&lines, 3).is_empty());
    }

    #[test]
    fn test_events_in_ascending_order() {
        let lines = analyze_lines(&["これで決定", "雑談", "A案を採用"]);
        let events = build_jump_events(&lines, 1);

        let indices: Vec<usize> = events.iter().map(|e| e.decision_index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(events[1].is_missing(Link::Reason));
    }

    #[test]
    fn test_zero_window_is_empty() {
        let lines = analyze_lines(&["なので比較、しかし", "これで決定"]);
        let events = build_jump_events(&lines, 0);

        assert_eq!(events.len(), 1);
        assert!(events[0].context.is_empty());
    }
}
