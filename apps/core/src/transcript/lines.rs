//! Analyzed transcript lines, manual role overrides and id alignment.
//!
//! Line ids are positional (`L1`, `L2`, ...). Anything keyed by id, such as
//! overrides or decision checklists, silently points at a different line once
//! the transcript gains or loses lines upstream. [`check_alignment`] makes that
//! visible instead of hiding it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::links::{LinkDetector, LinkSet};
use super::role::{Role, RoleClassifier};
use super::tokenizer::{trim_line, SpeakerParser};

/// One analyzed transcript line.
///
/// Serialized records also carry the effective `role`. It is derived on
/// write and ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", into = "LineRecord")]
pub struct Line {
    pub id: String,
    pub index: usize,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
    pub inferred_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_override: Option<Role>,
    #[serde(default)]
    pub links: LinkSet,
}

impl Line {
    /// Positional id for a 0-based index.
    pub fn id_for(index: usize) -> String {
        format!("L{}", index + 1)
    }

    /// Effective role: the manual override when present, else the inferred one.
    pub fn role(&self) -> Role {
        self.role_override.unwrap_or(self.inferred_role)
    }

    pub fn is_decision(&self) -> bool {
        self.role() == Role::Decision
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LineRecord {
    id: String,
    index: usize,
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<String>,
    text: String,
    role: Role,
    inferred_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_override: Option<Role>,
    links: LinkSet,
}

impl From<Line> for LineRecord {
    fn from(line: Line) -> Self {
        Self {
            role: line.role(),
            id: line.id,
            index: line.index,
            raw: line.raw,
            speaker: line.speaker,
            text: line.text,
            inferred_role: line.inferred_role,
            role_override: line.role_override,
            links: line.links,
        }
    }
}

/// Trim, drop empty entries and analyze each remaining line.
pub(crate) fn build_lines<S: AsRef<str>>(
    raw_lines: &[S],
    parser: &SpeakerParser,
    classifier: &RoleClassifier,
    detector: &LinkDetector,
) -> Vec<Line> {
    raw_lines
        .iter()
        .map(|line| trim_line(line.as_ref()))
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, raw)| {
            let parsed = parser.parse(raw);
            Line {
                id: Line::id_for(index),
                index,
                raw: raw.to_string(),
                inferred_role: classifier.classify(&parsed.text),
                role_override: None,
                links: detector.detect(&parsed.text),
                speaker: parsed.speaker,
                text: parsed.text,
            }
        })
        .collect()
}

/// Analyze raw lines with the default parser and rules.
pub fn analyze_lines<S: AsRef<str>>(raw_lines: &[S]) -> Vec<Line> {
    build_lines(
        raw_lines,
        &SpeakerParser::default(),
        &RoleClassifier::new(),
        &LinkDetector::new(),
    )
}

/// Outcome of applying overrides to a line set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideReport {
    /// Ids whose override was applied
    pub applied: Vec<String>,
    /// Ids with an override but no matching line
    pub stale: Vec<String>,
}

/// Manual role overrides keyed by line id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleOverrides(BTreeMap<String, Role>);

impl RoleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, role: Role) -> Option<Role> {
        self.0.insert(id.into(), role)
    }

    pub fn remove(&mut self, id: &str) -> Option<Role> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Role> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Role)> {
        self.0.iter().map(|(id, role)| (id.as_str(), *role))
    }

    /// Return new lines carrying exactly the overrides of this map.
    pub fn apply(&self, lines: &[Line]) -> (Vec<Line>, OverrideReport) {
        let mut applied = Vec::new();
        let updated = lines
            .iter()
            .map(|line| {
                let role_override = self.get(&line.id);
                if role_override.is_some() {
                    applied.push(line.id.clone());
                }
                Line {
                    role_override,
                    ..line.clone()
                }
            })
            .collect();

        let stale = self.stale_ids(lines);
        if !stale.is_empty() {
            warn!(
                stale = ?stale,
                "Role overrides reference lines that no longer exist"
            );
        }

        (updated, OverrideReport { applied, stale })
    }

    /// Ids in the map that have no line in `lines`.
    pub fn stale_ids(&self, lines: &[Line]) -> Vec<String> {
        self.0
            .keys()
            .filter(|id| !lines.iter().any(|line| &line.id == *id))
            .cloned()
            .collect()
    }

    /// Copy of the map without stale ids.
    pub fn prune(&self, lines: &[Line]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(id, _)| lines.iter().any(|line| &line.id == *id))
                .map(|(id, role)| (id.clone(), *role))
                .collect(),
        )
    }
}

impl FromIterator<(String, Role)> for RoleOverrides {
    fn from_iter<I: IntoIterator<Item = (String, Role)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a stored line set relates to a freshly analyzed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alignment {
    Aligned,
    /// Line count changed; every stored id may point elsewhere now
    CountMismatch { stored: usize, current: usize },
    /// Same count, but the raw text under these ids changed
    TextDrift { ids: Vec<String> },
}

impl Alignment {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Alignment::Aligned)
    }
}

/// Compare stored lines with the current ones by id and raw text.
pub fn check_alignment(stored: &[Line], current: &[Line]) -> Alignment {
    if stored.len() != current.len() {
        return Alignment::CountMismatch {
            stored: stored.len(),
            current: current.len(),
        };
    }

    let ids: Vec<String> = stored
        .iter()
        .zip(current)
        .filter(|(old, new)| old.id != new.id || old.raw != new.raw)
        .map(|(_, new)| new.id.clone())
        .collect();

    if ids.is_empty() {
        Alignment::Aligned
    } else {
        Alignment::TextDrift { ids }
    }
}
