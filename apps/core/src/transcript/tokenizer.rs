//! Transcript tokenizer and speaker-prefix parser.
//!
//! Splits a pasted transcript into trimmed, non-empty lines and peels off a
//! leading `name:` / `name：` speaker label. Two conventions coexist:
//! the line analyzer leaves unlabelled lines without a speaker, the scorer
//! attributes them to [`UNKNOWN_SPEAKER`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{EngineError, Result};

/// Maximum speaker label length accepted by the line analyzer.
///
/// Label bounds are counted in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane (most emoji) uses two of them.
pub const ANALYSIS_LABEL_MAX_CHARS: usize = 12;

/// Maximum speaker label length accepted by the scorer.
pub const SCORING_LABEL_MAX_CHARS: usize = 30;

/// Speaker assigned to unlabelled utterances in the scoring convention.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

// NOTE: expect() is acceptable here, the bounds are compile-time constants
static ANALYSIS_PARSER: LazyLock<SpeakerParser> = LazyLock::new(|| {
    SpeakerParser::with_max_label_chars(ANALYSIS_LABEL_MAX_CHARS)
        .expect("Invalid regex: analysis speaker prefix")
});

static SCORING_PARSER: LazyLock<SpeakerParser> = LazyLock::new(|| {
    SpeakerParser::with_max_label_chars(SCORING_LABEL_MAX_CHARS)
        .expect("Invalid regex: scoring speaker prefix")
});

/// A line split into its optional speaker and its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
}

/// A scoring utterance. Always attributed, possibly to [`UNKNOWN_SPEAKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

impl Utterance {
    pub fn is_unknown(&self) -> bool {
        self.speaker == UNKNOWN_SPEAKER
    }
}

/// Matches `label: rest` where the label is 1..=N UTF-16 units without a colon.
#[derive(Debug, Clone)]
pub struct SpeakerParser {
    pattern: Regex,
    max_label_chars: usize,
}

impl Default for SpeakerParser {
    fn default() -> Self {
        ANALYSIS_PARSER.clone()
    }
}

impl SpeakerParser {
    /// Build a parser accepting labels of up to `max_label_chars` UTF-16 units.
    pub fn with_max_label_chars(max_label_chars: usize) -> Result<Self> {
        // a char never spans fewer units, so this bound only prefilters
        let source = format!(r"^\s*([^:：]{{1,{}}})\s*[:：]\s*(.+)$", max_label_chars);
        let pattern =
            Regex::new(&source).map_err(|e| EngineError::invalid_pattern("speaker_prefix", e))?;

        Ok(Self {
            pattern,
            max_label_chars,
        })
    }

    /// Parser used by the scorer (30-character labels).
    pub fn scoring() -> Self {
        SCORING_PARSER.clone()
    }

    pub fn max_label_chars(&self) -> usize {
        self.max_label_chars
    }

    /// Split a line into speaker and text. Unlabelled lines have no speaker.
    pub fn parse(&self, line: &str) -> ParsedLine {
        let labelled = self
            .pattern
            .captures(line)
            .map(|caps| (trim_line(caps.get(1).unwrap().as_str()), trim_line(caps.get(2).unwrap().as_str())))
            .filter(|(label, _)| label.encode_utf16().count() <= self.max_label_chars);

        match labelled {
            Some((label, text)) => ParsedLine {
                speaker: Some(label.to_string()),
                text: text.to_string(),
            },
            None => ParsedLine {
                speaker: None,
                text: trim_line(line).to_string(),
            },
        }
    }

    /// Split a line into an utterance, using [`UNKNOWN_SPEAKER`] when unlabelled.
    pub fn utterance(&self, line: &str) -> Utterance {
        let parsed = self.parse(line);
        Utterance {
            speaker: parsed
                .speaker
                .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string()),
            text: parsed.text,
        }
    }
}

/// Trim surrounding whitespace, including full-width spaces and a stray BOM.
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Split raw text on LF/CRLF, trim every line and drop the empty ones.
pub fn normalize(input: &str) -> Vec<String> {
    input
        .lines()
        .map(trim_line)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a line with the analysis convention (12-character labels).
pub fn parse_speaker(line: &str) -> ParsedLine {
    ANALYSIS_PARSER.parse(line)
}

/// Normalize raw text into scoring utterances (30-character labels).
pub fn parse_transcript(input: &str) -> Vec<Utterance> {
    normalize(input)
        .iter()
        .map(|line| SCORING_PARSER.utterance(line))
        .collect()
}
