//! Decision detail view and navigation between DECISION lines.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::durability::{label_durability, DecisionCheck, DecisionChecks, DurabilityVerdict};
use crate::transcript::lines::Line;

/// Everything needed to review one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDetail {
    pub line: Line,
    /// Preceding lines, oldest first
    pub context: Vec<Line>,
    /// False when the id points at a line that is not (or no longer) a DECISION
    pub is_decision: bool,
    pub prev_decision_id: Option<String>,
    pub next_decision_id: Option<String>,
    pub check: DecisionCheck,
    pub verdict: DurabilityVerdict,
}

fn position_of(lines: &[Line], id: &str) -> Option<usize> {
    lines.iter().position(|line| line.id == id)
}

/// Id of the first DECISION line after `id`.
pub fn next_decision_id(lines: &[Line], id: &str) -> Option<String> {
    let position = position_of(lines, id)?;
    lines[position + 1..]
        .iter()
        .find(|line| line.is_decision())
        .map(|line| line.id.clone())
}

/// Id of the last DECISION line before `id`.
pub fn prev_decision_id(lines: &[Line], id: &str) -> Option<String> {
    let position = position_of(lines, id)?;
    lines[..position]
        .iter()
        .rev()
        .find(|line| line.is_decision())
        .map(|line| line.id.clone())
}

/// Detail of the line `id`, or `None` when no such line exists.
pub fn decision_detail(
    lines: &[Line],
    id: &str,
    checks: &DecisionChecks,
    context_size: usize,
) -> Option<DecisionDetail> {
    let position = position_of(lines, id)?;
    let line = lines[position].clone();
    let check = checks.get_or_default(id);
    let verdict = label_durability(&check);

    Some(DecisionDetail {
        context: lines[position.saturating_sub(context_size)..position].to_vec(),
        is_decision: line.is_decision(),
        prev_decision_id: prev_decision_id(lines, id),
        next_decision_id: next_decision_id(lines, id),
        line,
        check,
        verdict,
    })
}

/// [`decision_detail`] with the configured context size.
pub fn decision_detail_for(
    lines: &[Line],
    id: &str,
    checks: &DecisionChecks,
    config: &EngineConfig,
) -> Option<DecisionDetail> {
    decision_detail(lines, id, checks, config.detail_context_size)
}
