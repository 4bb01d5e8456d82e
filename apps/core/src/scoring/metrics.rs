//! Transcript metrics feeding the four-axis scorer.
//!
//! Counts are kept exactly as the scoring formulas expect them: keyword hits
//! count once per (utterance, keyword) pair, URL and number hits once per
//! utterance, and reason length is measured in UTF-16 code units.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::four_axis::{round_half_up, ScoreInputs};
use crate::transcript::tokenizer::{Utterance, UNKNOWN_SPEAKER};

const INFO_KEYWORDS: &[&str] = &[
    "根拠", "データ", "統計", "資料", "出典", "論文", "研究", "URL", "参考",
];
const DISSENT_KEYWORDS: &[&str] = &["反対", "懸念", "リスク", "問題", "難しい", "微妙", "怖い", "無理"];
const ALT_KEYWORDS: &[&str] = &["代替", "別案", "もう一つ", "他の案", "プランB", "B案", "C案"];
const CHANGE_KEYWORDS: &[&str] = &["修正", "訂正", "変更", "やっぱ", "撤回", "更新"];
const REASON_KEYWORDS: &[&str] = &["理由", "だから", "なので", "根拠", "結論"];

/// Upper bound of the estimated option count.
const MAX_OPTIONS: usize = 5;

// NOTE: expect() is acceptable here, the patterns are static
static URL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+)").expect("Invalid regex: url-like pattern")
});

// ASCII digits and ASCII word boundaries only
static NUMBER_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(\.[0-9]+)?\s?%|(?-u:\b)20[0-9]{2}(?-u:\b)|(?-u:\b)[0-9]{1,3}(?-u:\b))")
        .expect("Invalid regex: number-like pattern")
});

static OPTION_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[ABC]案(?-u:\b)").expect("Invalid regex: option mention pattern")
});

/// Substring keyword lists used by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLists {
    /// Evidence and source markers
    pub info: Vec<String>,
    pub dissent: Vec<String>,
    /// Alternative-option markers
    pub alt: Vec<String>,
    pub change: Vec<String>,
    pub reason: Vec<String>,
}

impl Default for KeywordLists {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            info: owned(INFO_KEYWORDS),
            dissent: owned(DISSENT_KEYWORDS),
            alt: owned(ALT_KEYWORDS),
            change: owned(CHANGE_KEYWORDS),
            reason: owned(REASON_KEYWORDS),
        }
    }
}

/// Utterance count of one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerCount {
    pub speaker: String,
    pub utterances: usize,
}

/// Aggregate statistics of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMetrics {
    pub utterance_count: usize,
    /// Per-speaker counts in order of first appearance, UNKNOWN included
    pub speaker_counts: Vec<SpeakerCount>,
    /// Distinct speakers, UNKNOWN excluded
    pub speakers_count: usize,
    pub top_share_pct: u32,
    pub url_like: usize,
    pub info_hits: usize,
    pub number_like: usize,
    /// url_like + info_hits + number_like
    pub sources: usize,
    pub dissent: usize,
    pub alt: usize,
    pub option_mentions: usize,
    /// Estimated number of options on the table, 1..=5
    pub options: usize,
    pub changes: usize,
    pub reason_len: usize,
    /// speakers_count, or 1 when nobody is labelled
    pub participants: usize,
}

/// One hit per (utterance, keyword) pair.
pub fn count_keyword_hits<S: AsRef<str>>(utterances: &[Utterance], keywords: &[S]) -> usize {
    utterances
        .iter()
        .map(|u| {
            keywords
                .iter()
                .filter(|k| u.text.contains(k.as_ref()))
                .count()
        })
        .sum()
}

fn count_matching(utterances: &[Utterance], pattern: &Regex) -> usize {
    utterances.iter().filter(|u| pattern.is_match(&u.text)).count()
}

/// Per-speaker counts in order of first appearance.
pub fn speaker_counts(utterances: &[Utterance]) -> Vec<SpeakerCount> {
    let mut counts: Vec<SpeakerCount> = Vec::new();
    for utterance in utterances {
        match counts.iter_mut().find(|c| c.speaker == utterance.speaker) {
            Some(entry) => entry.utterances += 1,
            None => counts.push(SpeakerCount {
                speaker: utterance.speaker.clone(),
                utterances: 1,
            }),
        }
    }
    counts
}

impl TranscriptMetrics {
    pub fn from_utterances(utterances: &[Utterance], keywords: &KeywordLists) -> Self {
        let speaker_counts = speaker_counts(utterances);
        let speakers_count = speaker_counts
            .iter()
            .filter(|c| c.speaker != UNKNOWN_SPEAKER)
            .count();

        let utterance_count = utterances.len();
        let top = speaker_counts.iter().map(|c| c.utterances).max().unwrap_or(0);
        let top_share = if utterance_count > 0 {
            top as f64 / utterance_count as f64
        } else {
            0.0
        };
        let top_share_pct = round_half_up(top_share * 100.0) as u32;

        let url_like = count_matching(utterances, &URL_LIKE);
        let info_hits = count_keyword_hits(utterances, &keywords.info);
        let number_like = count_matching(utterances, &NUMBER_LIKE);

        let alt = count_keyword_hits(utterances, &keywords.alt);
        let option_mentions = count_matching(utterances, &OPTION_MENTION);
        let options = (round_half_up((option_mentions + alt) as f64 / 2.0) as usize)
            .clamp(1, MAX_OPTIONS);

        let reason_text = utterances
            .iter()
            .filter(|u| keywords.reason.iter().any(|k| u.text.contains(k.as_str())))
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            utterance_count,
            speakers_count,
            top_share_pct,
            url_like,
            info_hits,
            number_like,
            sources: url_like + info_hits + number_like,
            dissent: count_keyword_hits(utterances, &keywords.dissent),
            alt,
            option_mentions,
            options,
            changes: count_keyword_hits(utterances, &keywords.change),
            reason_len: reason_text.encode_utf16().count(),
            participants: speakers_count.max(1),
            speaker_counts,
        }
    }

    /// Inputs of the simple (geometric) formula.
    pub fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            participants: self.participants as f64,
            top_share_pct: self.top_share_pct as f64,
            sources: self.sources as f64,
            options: self.options as f64,
            dissent: self.dissent as f64,
            changes: self.changes as f64,
            reason_len: self.reason_len as f64,
        }
    }

    /// Advisory notes, in display order.
    pub fn notes(&self) -> Vec<ScoreNote> {
        let mut notes = Vec::new();
        if self.speakers_count == 0 {
            notes.push(ScoreNote::NoSpeakerLabels);
        }
        if self.sources == 0 {
            notes.push(ScoreNote::NoSourcesDetected);
        }
        if self.dissent == 0 {
            notes.push(ScoreNote::LowDissent);
        }
        notes
    }
}

/// Advisory note attached to a score report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNote {
    NoSpeakerLabels,
    NoSourcesDetected,
    LowDissent,
}

impl ScoreNote {
    pub fn message(&self) -> &'static str {
        match self {
            ScoreNote::NoSpeakerLabels => {
                "No speaker labels found, participation is less accurate (recommended: `name: utterance`)."
            }
            ScoreNote::NoSourcesDetected => "No evidence-like statements were detected.",
            ScoreNote::LowDissent => {
                "Few objections or concerns were recorded; deliberation may be insufficient."
            }
        }
    }

    pub fn message_ja(&self) -> &'static str {
        match self {
            ScoreNote::NoSpeakerLabels => {
                "話者ラベルがないため、参加の精度が下がります（推奨：名前: 発言）。"
            }
            ScoreNote::NoSourcesDetected => "根拠らしい記述が検出されませんでした。",
            ScoreNote::LowDissent => {
                "反対/懸念の記述が少ないため、検討が不足している可能性があります。"
            }
        }
    }
}
