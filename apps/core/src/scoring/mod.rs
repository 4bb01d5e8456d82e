//! # Scoring Module
//!
//! Heuristic four-axis score of a transcript: Participation, Information,
//! Deliberation, Transparency. Counts explicit markers only.
//!
//! ## Components
//! - `metrics`: speaker statistics and keyword/regex hit counts
//! - `four_axis`: the two scoring formulas behind [`ScoringStrategy`]

pub mod four_axis;
pub mod metrics;

pub use four_axis::{
    clamp01, resolve_facilitator, round_half_up, score_facilitator_excluded, score_four_axis,
    sigmoid01, FacilitatorExcludedScorer, FacilitatorMode, FourAxisScore, GeometricScorer,
    ParticipationBreakdown, ScoreInputs, ScoringStrategy,
};
pub use metrics::{count_keyword_hits, KeywordLists, ScoreNote, SpeakerCount, TranscriptMetrics};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::transcript::tokenizer::{normalize, SpeakerParser};

/// Metrics, scores and advisory notes for one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub strategy: String,
    pub metrics: TranscriptMetrics,
    pub scores: FourAxisScore,
    pub notes: Vec<ScoreNote>,
}

/// Scores raw transcripts with a configurable parser and keyword lists.
#[derive(Debug, Clone)]
pub struct TranscriptScorer {
    parser: SpeakerParser,
    keywords: KeywordLists,
}

impl Default for TranscriptScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptScorer {
    pub fn new() -> Self {
        Self {
            parser: SpeakerParser::scoring(),
            keywords: KeywordLists::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordLists) -> Self {
        self.keywords = keywords;
        self
    }

    /// Scorer using the configured label bound and rule book keywords
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let rules = config.load_rule_book()?;
        Ok(Self {
            parser: SpeakerParser::with_max_label_chars(config.scoring_label_max_chars)?,
            keywords: rules.keywords,
        })
    }

    pub fn metrics(&self, input: &str) -> TranscriptMetrics {
        let utterances: Vec<_> = normalize(input)
            .iter()
            .map(|line| self.parser.utterance(line))
            .collect();
        TranscriptMetrics::from_utterances(&utterances, &self.keywords)
    }

    pub fn score(&self, input: &str, strategy: &dyn ScoringStrategy) -> ScoreReport {
        let metrics = self.metrics(input);
        let scores = strategy.score(&metrics);
        let notes = metrics.notes();

        debug!(
            strategy = strategy.name(),
            utterances = metrics.utterance_count,
            total = scores.total,
            "Transcript scored"
        );

        ScoreReport {
            strategy: strategy.name().to_string(),
            metrics,
            scores,
            notes,
        }
    }
}

/// One-shot scoring with the default parser and keywords.
pub fn score_transcript(input: &str, strategy: &dyn ScoringStrategy) -> ScoreReport {
    TranscriptScorer::new().score(input, strategy)
}
