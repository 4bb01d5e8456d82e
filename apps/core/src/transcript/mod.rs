//! # Transcript Module
//!
//! Rule-based analysis of meeting transcripts. No model, no semantics: only
//! explicit textual markers are considered.
//!
//! ## Components
//! - `tokenizer`: line normalization and speaker-prefix parsing
//! - `rules`: data-driven regex rule groups
//! - `role`: DECISION / COMMIT / CONSENSUS / NONE classification
//! - `links`: REASON / COMPARE / OBJECTION detection
//! - `lines`: analyzed lines, manual overrides, id alignment
//! - `jump`: jump-event construction
//! - `analyzer`: main orchestrator

pub mod analyzer;
pub mod jump;
pub mod lines;
pub mod links;
pub mod role;
pub mod rules;
pub mod tokenizer;

pub use analyzer::{analyze_transcript, TranscriptAnalysis, TranscriptAnalyzer};
pub use jump::{build_jump_events, ContextLine, JumpEvent, DEFAULT_WINDOW_SIZE};
pub use lines::{analyze_lines, check_alignment, Alignment, Line, OverrideReport, RoleOverrides};
pub use links::{default_link_rules, detect_links, Link, LinkDetector, LinkSet};
pub use role::{default_role_rules, infer_role, Role, RoleClassifier};
pub use rules::{RuleGroup, RuleGroupConfig};
pub use tokenizer::{
    normalize, parse_speaker, parse_transcript, ParsedLine, SpeakerParser, Utterance,
    ANALYSIS_LABEL_MAX_CHARS, SCORING_LABEL_MAX_CHARS, UNKNOWN_SPEAKER,
};
