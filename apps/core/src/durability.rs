//! Decision durability: a verdict derived from a manually kept checklist.
//!
//! The reason bit is mandatory. Comparison and counter-argument handling are
//! bonuses: they raise the level but their absence alone never pushes a
//! decision with a connected reason below OK.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-decision checklist, entered by a person reviewing the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionCheck {
    pub decision_line_id: String,
    /// The reason behind the decision is traceable
    pub has_reason: bool,
    /// Alternatives were compared
    pub has_comparison: bool,
    /// Objections or concerns were handled
    pub has_counter: bool,
    pub note_reason: String,
    pub note_comparison: String,
    pub note_counter: String,
}

impl DecisionCheck {
    /// Empty checklist for a decision line.
    pub fn new(decision_line_id: impl Into<String>) -> Self {
        Self {
            decision_line_id: decision_line_id.into(),
            ..Self::default()
        }
    }

    /// Copy with the patch merged in. The id never changes.
    pub fn patched(&self, patch: &CheckPatch) -> Self {
        Self {
            decision_line_id: self.decision_line_id.clone(),
            has_reason: patch.has_reason.unwrap_or(self.has_reason),
            has_comparison: patch.has_comparison.unwrap_or(self.has_comparison),
            has_counter: patch.has_counter.unwrap_or(self.has_counter),
            note_reason: patch
                .note_reason
                .clone()
                .unwrap_or_else(|| self.note_reason.clone()),
            note_comparison: patch
                .note_comparison
                .clone()
                .unwrap_or_else(|| self.note_comparison.clone()),
            note_counter: patch
                .note_counter
                .clone()
                .unwrap_or_else(|| self.note_counter.clone()),
        }
    }
}

/// Partial update of a [`DecisionCheck`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckPatch {
    pub has_reason: Option<bool>,
    pub has_comparison: Option<bool>,
    pub has_counter: Option<bool>,
    pub note_reason: Option<String>,
    pub note_comparison: Option<String>,
    pub note_counter: Option<String>,
}

/// Checklists keyed by decision line id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionChecks(BTreeMap<String, DecisionCheck>);

impl DecisionChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&DecisionCheck> {
        self.0.get(id)
    }

    /// Stored checklist, or an empty one for `id`.
    pub fn get_or_default(&self, id: &str) -> DecisionCheck {
        self.0
            .get(id)
            .cloned()
            .unwrap_or_else(|| DecisionCheck::new(id))
    }

    /// New map with `patch` merged into the checklist of `id`.
    pub fn updated(&self, id: &str, patch: &CheckPatch) -> Self {
        let mut next = self.0.clone();
        let check = self.get_or_default(id).patched(patch);
        next.insert(
            id.to_string(),
            DecisionCheck {
                decision_line_id: id.to_string(),
                ..check
            },
        );
        Self(next)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DecisionCheck> for DecisionChecks {
    fn from_iter<I: IntoIterator<Item = DecisionCheck>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|check| (check.decision_line_id.clone(), check))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurabilityStatus {
    Bad,
    Ok,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityLevel {
    Insufficient,
    Minimum,
    MinimumPlus,
    Medium,
    High,
}

impl DurabilityLevel {
    pub fn status(&self) -> DurabilityStatus {
        match self {
            DurabilityLevel::Insufficient => DurabilityStatus::Bad,
            DurabilityLevel::Minimum | DurabilityLevel::MinimumPlus | DurabilityLevel::Medium => {
                DurabilityStatus::Ok
            }
            DurabilityLevel::High => DurabilityStatus::Good,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurabilityLevel::Insufficient => "insufficient — reason not connected",
            DurabilityLevel::Minimum => "minimum — reason only",
            DurabilityLevel::MinimumPlus => "minimum-plus — reason + comparison",
            DurabilityLevel::Medium => "medium — reason + objection handling",
            DurabilityLevel::High => "high — reason + comparison + objection handling",
        }
    }

    pub fn label_ja(&self) -> &'static str {
        match self {
            DurabilityLevel::Insufficient => "耐久性不足（理由が未接続）",
            DurabilityLevel::Minimum => "最低限（理由のみ）",
            DurabilityLevel::MinimumPlus => "最低限＋（理由＋比較）",
            DurabilityLevel::Medium => "中（理由＋反論処理）",
            DurabilityLevel::High => "高（理由＋比較＋反論処理）",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurabilityVerdict {
    pub level: DurabilityLevel,
    pub status: DurabilityStatus,
    pub label: String,
}

impl From<DurabilityLevel> for DurabilityVerdict {
    fn from(level: DurabilityLevel) -> Self {
        Self {
            level,
            status: level.status(),
            label: level.label().to_string(),
        }
    }
}

/// Verdict for a checklist.
pub fn label_durability(check: &DecisionCheck) -> DurabilityVerdict {
    let level = match (check.has_reason, check.has_comparison, check.has_counter) {
        (false, _, _) => DurabilityLevel::Insufficient,
        (true, true, true) => DurabilityLevel::High,
        (true, false, true) => DurabilityLevel::Medium,
        (true, true, false) => DurabilityLevel::MinimumPlus,
        (true, false, false) => DurabilityLevel::Minimum,
    };
    level.into()
}
