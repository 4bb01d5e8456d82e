//! Durability Module Tests
//!
//! Checklist verdicts, checklist updates and the decision detail view built
//! on top of analyzed lines.

use crate::decision::{decision_detail, next_decision_id, prev_decision_id};
use crate::durability::{
    label_durability, CheckPatch, DecisionCheck, DecisionChecks, DurabilityLevel,
    DurabilityStatus,
};
use crate::transcript::{analyze_lines, TranscriptAnalyzer};

#[cfg(test)]
mod verdict_tests {
    use super::*;

    #[test]
    fn test_full_decision_table() {
        let expected = [
            ((false, false, false), DurabilityLevel::Insufficient, DurabilityStatus::Bad),
            ((false, true, false), DurabilityLevel::Insufficient, DurabilityStatus::Bad),
            ((false, false, true), DurabilityLevel::Insufficient, DurabilityStatus::Bad),
            ((false, true, true), DurabilityLevel::Insufficient, DurabilityStatus::Bad),
            ((true, false, false), DurabilityLevel::Minimum, DurabilityStatus::Ok),
            ((true, true, false), DurabilityLevel::MinimumPlus, DurabilityStatus::Ok),
            ((true, false, true), DurabilityLevel::Medium, DurabilityStatus::Ok),
            ((true, true, true), DurabilityLevel::High, DurabilityStatus::Good),
        ];

        for ((reason, comparison, counter), level, status) in expected {
            let check = DecisionCheck {
                has_reason: reason,
                has_comparison: comparison,
                has_counter: counter,
                ..DecisionCheck::new("L1")
            };
            let verdict = label_durability(&check);
            assert_eq!(verdict.level, level, "check {:?}", (reason, comparison, counter));
            assert_eq!(verdict.status, status);
            assert_eq!(verdict.label, level.label());
        }
    }

    #[test]
    fn test_reason_only_is_minimum() {
        let check = DecisionCheck {
            has_reason: true,
            ..DecisionCheck::new("L1")
        };
        let verdict = label_durability(&check);

        assert_eq!(verdict.status, DurabilityStatus::Ok);
        assert_eq!(verdict.label, "minimum — reason only");
    }

    #[test]
    fn test_notes_do_not_affect_the_verdict() {
        let check = DecisionCheck {
            note_reason: "see the cost table".to_string(),
            note_counter: "risk was discussed".to_string(),
            ..DecisionCheck::new("L1")
        };
        assert_eq!(label_durability(&check).status, DurabilityStatus::Bad);
    }

    #[test]
    fn test_verdict_serializes_lowercase_status() {
        let verdict = label_durability(&DecisionCheck::new("L1"));
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "bad");
        assert_eq!(json["level"], "insufficient");
    }
}

#[cfg(test)]
mod checklist_tests {
    use super::*;

    #[test]
    fn test_patch_cannot_rename_a_check() {
        let stored: DecisionChecks = vec![DecisionCheck::new("L9")].into_iter().collect();
        let updated = stored.updated("L2", &CheckPatch::default());

        assert_eq!(updated.len(), 2);
        assert_eq!(updated.get_or_default("L2").decision_line_id, "L2");
        assert_eq!(updated.ids().collect::<Vec<_>>(), vec!["L2", "L9"]);
    }

    #[test]
    fn test_unchecking_reason_downgrades() {
        let checks = DecisionChecks::new()
            .updated(
                "L1",
                &CheckPatch {
                    has_reason: Some(true),
                    has_comparison: Some(true),
                    has_counter: Some(true),
                    ..CheckPatch::default()
                },
            )
            .updated(
                "L1",
                &CheckPatch {
                    has_reason: Some(false),
                    ..CheckPatch::default()
                },
            );

        let verdict = label_durability(&checks.get_or_default("L1"));
        assert_eq!(verdict.level, DurabilityLevel::Insufficient);
    }

    #[test]
    fn test_patch_from_json() {
        let patch: CheckPatch =
            serde_json::from_str(r#"{ "hasCounter": true, "noteCounter": "handled" }"#).unwrap();
        let check = DecisionCheck::new("L4").patched(&patch);

        assert!(check.has_counter);
        assert!(!check.has_reason);
        assert_eq!(check.note_counter, "handled");
    }
}

#[cfg(test)]
mod detail_tests {
    use super::*;

    const MEETING: &str = "Mami: 予算の話をしよう
Terumasa: A案よりB案が安い
Mami: でもB案は納期が心配
Terumasa: なので納期は短期で詰める
Mami: じゃあB案で確定
Terumasa: 了解
Mami: 次の議題は採用で決定";

    #[test]
    fn test_walk_through_decisions() {
        let analysis = TranscriptAnalyzer::new().analyze(MEETING);
        let ids: Vec<&str> = analysis.decisions().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["L5", "L7"]);

        assert_eq!(next_decision_id(&analysis.lines, "L5").as_deref(), Some("L7"));
        assert_eq!(prev_decision_id(&analysis.lines, "L7").as_deref(), Some("L5"));
    }

    #[test]
    fn test_detail_context_window() {
        let lines = analyze_lines(&normalize_meeting());
        let detail = decision_detail(&lines, "L5", &DecisionChecks::new(), 5).unwrap();

        assert_eq!(detail.context.len(), 4);
        assert_eq!(detail.context[0].id, "L1");
        assert!(detail.is_decision);
        assert_eq!(detail.prev_decision_id, None);
        assert_eq!(detail.next_decision_id.as_deref(), Some("L7"));
        assert_eq!(detail.verdict.level, DurabilityLevel::Insufficient);
    }

    fn normalize_meeting() -> Vec<String> {
        crate::transcript::normalize(MEETING)
    }
}
