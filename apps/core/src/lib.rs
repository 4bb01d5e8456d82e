//! Giron Core - rule-based meeting transcript analysis.
//!
//! Finds "jump events": DECISION lines whose preceding lines show no explicit
//! reason, comparison or objection marker. Also computes a four-axis
//! heuristic score of the whole discussion and a durability verdict per
//! decision from a manually kept checklist.

pub mod config;
pub mod decision;
pub mod durability;
pub mod error;
pub mod rulebook;
pub mod scoring;
pub mod store;
pub mod telemetry;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use decision::{
    decision_detail, decision_detail_for, next_decision_id, prev_decision_id, DecisionDetail,
};
pub use durability::{
    label_durability, CheckPatch, DecisionCheck, DecisionChecks, DurabilityLevel,
    DurabilityStatus, DurabilityVerdict,
};
pub use error::{EngineError, Result};
pub use rulebook::RuleBook;
pub use scoring::{
    score_facilitator_excluded, score_four_axis, score_transcript, FacilitatorExcludedScorer,
    FacilitatorMode, FourAxisScore, GeometricScorer, KeywordLists, ScoreInputs, ScoreNote,
    ScoreReport, ScoringStrategy, TranscriptMetrics, TranscriptScorer,
};
pub use store::JsonStore;
pub use telemetry::{init_tracing, init_tracing_from, LogFormat};
pub use transcript::{
    analyze_lines, analyze_transcript, build_jump_events, check_alignment, detect_links,
    infer_role, normalize, parse_speaker, Alignment, JumpEvent, Line, Link, LinkSet,
    ParsedLine, Role, RoleOverrides, TranscriptAnalysis, TranscriptAnalyzer,
};
