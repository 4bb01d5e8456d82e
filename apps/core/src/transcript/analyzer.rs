//! Transcript Analyzer - orchestrator for the line pipeline.
//!
//! normalize → speaker parse → role → links → jump events.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::jump::{build_jump_events, JumpEvent, DEFAULT_WINDOW_SIZE};
use super::lines::{build_lines, Line, OverrideReport, RoleOverrides};
use super::links::LinkDetector;
use super::role::RoleClassifier;
use super::tokenizer::{normalize, SpeakerParser};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::rulebook::RuleBook;

/// Lines plus the jump events derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub lines: Vec<Line>,
    pub events: Vec<JumpEvent>,
}

impl TranscriptAnalysis {
    pub fn decisions(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|line| line.is_decision())
    }

    pub fn decision_count(&self) -> usize {
        self.decisions().count()
    }

    /// Short description for logs.
    pub fn summary(&self) -> String {
        format!(
            "Lines: {}, Decisions: {}, Jump events: {}",
            self.lines.len(),
            self.decision_count(),
            self.events.len()
        )
    }
}

/// Main transcript analyzer holding the configured components
#[derive(Debug, Clone)]
pub struct TranscriptAnalyzer {
    parser: SpeakerParser,
    classifier: RoleClassifier,
    detector: LinkDetector,
    window_size: usize,
}

impl Default for TranscriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptAnalyzer {
    /// Create an analyzer with default rules and a window of 3
    pub fn new() -> Self {
        Self {
            parser: SpeakerParser::default(),
            classifier: RoleClassifier::new(),
            detector: LinkDetector::new(),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Create an analyzer from a rule book
    pub fn with_rules(rules: &RuleBook) -> Result<Self> {
        Ok(Self {
            classifier: rules.role_classifier()?,
            detector: rules.link_detector()?,
            ..Self::new()
        })
    }

    /// Create an analyzer honoring every analysis setting of the config
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let rules = config.load_rule_book()?;
        let analyzer = Self::with_rules(&rules)?
            .with_window_size(config.window_size)
            .with_parser(SpeakerParser::with_max_label_chars(
                config.analysis_label_max_chars,
            )?);

        Ok(analyzer)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_parser(mut self, parser: SpeakerParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn analyze_lines<S: AsRef<str>>(&self, raw_lines: &[S]) -> Vec<Line> {
        build_lines(raw_lines, &self.parser, &self.classifier, &self.detector)
    }

    /// Analyze a raw transcript
    pub fn analyze(&self, input: &str) -> TranscriptAnalysis {
        let lines = self.analyze_lines(&normalize(input));
        let events = build_jump_events(&lines, self.window_size);

        let analysis = TranscriptAnalysis { lines, events };
        debug!(window = self.window_size, "{}", analysis.summary());
        analysis
    }

    /// Analyze a raw transcript with manual role overrides applied before
    /// the jump events are built
    pub fn analyze_with_overrides(
        &self,
        input: &str,
        overrides: &RoleOverrides,
    ) -> (TranscriptAnalysis, OverrideReport) {
        let inferred = self.analyze_lines(&normalize(input));
        let (lines, report) = overrides.apply(&inferred);
        let events = build_jump_events(&lines, self.window_size);

        let analysis = TranscriptAnalysis { lines, events };
        debug!(
            window = self.window_size,
            applied = report.applied.len(),
            stale = report.stale.len(),
            "{}",
            analysis.summary()
        );
        (analysis, report)
    }
}

/// One-shot analysis with default rules.
pub fn analyze_transcript(input: &str, window_size: usize) -> TranscriptAnalysis {
    TranscriptAnalyzer::new()
        .with_window_size(window_size)
        .analyze(input)
}
