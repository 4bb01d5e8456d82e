//! Four-axis scoring: Participation, Information, Deliberation, Transparency.
//!
//! Two formulas coexist and are both kept as named strategies:
//! - the simple one combines the axes with a geometric mean,
//! - the facilitator-excluded one drops a designated speaker from the
//!   participation balance and combines the axes with an arithmetic mean.
//!
//! Blend weights and sigmoid offsets/scales are fixed values; callers compare
//! scores across meetings, so they must not drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::metrics::{SpeakerCount, TranscriptMetrics};
use crate::error::EngineError;
use crate::transcript::tokenizer::UNKNOWN_SPEAKER;

/// Minimum share of the remaining utterances for a speaker to count as heard.
const VOICE_SHARE_THRESHOLD: f64 = 0.10;

/// Clamp to [0, 1]. NaN maps to 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// Logistic sigmoid `1 / (1 + e^-x)`.
pub fn sigmoid01(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Nearest integer, ties toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn to_score(x: f64) -> u32 {
    round_half_up(x).clamp(0.0, 100.0) as u32
}

/// Inputs of the simple formula. All values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub participants: f64,
    /// Share of the most active speaker, 0..=100
    pub top_share_pct: f64,
    pub sources: f64,
    pub options: f64,
    pub dissent: f64,
    pub changes: f64,
    pub reason_len: f64,
}

/// The four axes plus their combination, each an integer in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourAxisScore {
    #[serde(rename = "P")]
    pub p: u32,
    #[serde(rename = "I")]
    pub i: u32,
    #[serde(rename = "D")]
    pub d: u32,
    #[serde(rename = "T")]
    pub t: u32,
    #[serde(rename = "Total")]
    pub total: u32,
}

fn fair_top(top_share_pct: f64) -> f64 {
    clamp01(1.0 - (top_share_pct - 25.0) / 50.0)
}

fn speaker_count_ok(participants: f64) -> f64 {
    sigmoid01((participants - 3.0) / 2.0)
}

fn information(sources: f64) -> u32 {
    to_score(100.0 * sigmoid01((sources - 1.0) / 1.2))
}

fn deliberation(options: f64, dissent: f64) -> u32 {
    let opt = sigmoid01((options - 2.0) / 1.0);
    let dis = sigmoid01((dissent - 0.5) / 1.0);
    to_score(100.0 * (0.6 * opt + 0.4 * dis))
}

fn transparency(changes: f64, reason_len: f64, reason_offset: f64, reason_scale: f64) -> u32 {
    let chg = sigmoid01((changes - 1.0) / 1.5);
    let rsn = sigmoid01((reason_len - reason_offset) / reason_scale);
    to_score(100.0 * (0.5 * chg + 0.5 * rsn))
}

/// Simple formula, geometric-mean total.
pub fn score_four_axis(inputs: &ScoreInputs) -> FourAxisScore {
    let p = to_score(
        100.0
            * (0.85 * fair_top(inputs.top_share_pct)
                + 0.15 * speaker_count_ok(inputs.participants)),
    );
    let i = information(inputs.sources);
    let d = deliberation(inputs.options, inputs.dissent);
    let t = transparency(inputs.changes, inputs.reason_len, 120.0, 60.0);

    let product: f64 = [p, i, d, t]
        .iter()
        .map(|axis| clamp01(*axis as f64 / 100.0))
        .product();
    let total = to_score(100.0 * product.powf(0.25));

    FourAxisScore { p, i, d, t, total }
}

/// Which speaker, if any, is left out of the participation balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilitatorMode {
    /// Most active labelled speaker
    #[default]
    Auto,
    Disabled,
    Named(String),
}

impl FromStr for FacilitatorMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(EngineError::Config("facilitator must not be empty".into()));
        }
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(FacilitatorMode::Auto),
            "none" | "off" | "disabled" => Ok(FacilitatorMode::Disabled),
            _ => Ok(FacilitatorMode::Named(value.to_string())),
        }
    }
}

impl fmt::Display for FacilitatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilitatorMode::Auto => write!(f, "auto"),
            FacilitatorMode::Disabled => write!(f, "none"),
            FacilitatorMode::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Resolve the facilitator against the speaker counts.
///
/// Auto mode picks the most active speaker other than [`UNKNOWN_SPEAKER`],
/// ties going to the one who spoke first. A named facilitator who never
/// speaks resolves to nobody.
pub fn resolve_facilitator(counts: &[SpeakerCount], mode: &FacilitatorMode) -> Option<String> {
    match mode {
        FacilitatorMode::Disabled => None,
        FacilitatorMode::Named(name) => {
            if counts.iter().any(|c| &c.speaker == name) {
                Some(name.clone())
            } else {
                warn!(facilitator = %name, "Facilitator does not appear in the transcript");
                None
            }
        }
        FacilitatorMode::Auto => counts
            .iter()
            .filter(|c| c.speaker != UNKNOWN_SPEAKER)
            .fold(None::<&SpeakerCount>, |best, c| match best {
                Some(b) if b.utterances >= c.utterances => Some(b),
                _ => Some(c),
            })
            .map(|c| c.speaker.clone()),
    }
}

/// Participation statistics once the facilitator is set aside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationBreakdown {
    pub facilitator: Option<String>,
    pub remaining_utterances: usize,
    pub top_share_pct: u32,
    pub participants: usize,
    /// Fraction of remaining labelled speakers with at least a 10% share
    pub voice_rate: f64,
}

impl ParticipationBreakdown {
    pub fn from_counts(counts: &[SpeakerCount], mode: &FacilitatorMode) -> Self {
        let facilitator = resolve_facilitator(counts, mode);
        let remaining: Vec<&SpeakerCount> = counts
            .iter()
            .filter(|c| Some(&c.speaker) != facilitator.as_ref())
            .collect();

        let remaining_utterances: usize = remaining.iter().map(|c| c.utterances).sum();
        let total = remaining_utterances.max(1) as f64;

        let top_share_pct = remaining
            .iter()
            .map(|c| c.utterances)
            .max()
            .map(|top| round_half_up(100.0 * top as f64 / total) as u32)
            .unwrap_or(0);

        let named: Vec<&&SpeakerCount> = remaining
            .iter()
            .filter(|c| c.speaker != UNKNOWN_SPEAKER)
            .collect();
        let participants = named.len().max(1);
        let heard = named
            .iter()
            .filter(|c| c.utterances as f64 / total >= VOICE_SHARE_THRESHOLD)
            .count();

        Self {
            facilitator,
            remaining_utterances,
            top_share_pct,
            participants,
            voice_rate: heard as f64 / participants as f64,
        }
    }
}

/// Facilitator-excluded formula, arithmetic-mean total.
pub fn score_facilitator_excluded(
    metrics: &TranscriptMetrics,
    mode: &FacilitatorMode,
) -> FourAxisScore {
    let breakdown = ParticipationBreakdown::from_counts(&metrics.speaker_counts, mode);

    let p = to_score(
        100.0
            * (0.55 * fair_top(breakdown.top_share_pct as f64)
                + 0.3 * breakdown.voice_rate
                + 0.15 * speaker_count_ok(breakdown.participants as f64)),
    );
    let i = information(metrics.sources as f64);
    let d = deliberation(metrics.options as f64, metrics.dissent as f64);
    let t = transparency(metrics.changes as f64, metrics.reason_len as f64, 80.0, 40.0);

    let total = to_score((p + i + d + t) as f64 / 4.0);

    FourAxisScore { p, i, d, t, total }
}

/// A named way of turning metrics into a [`FourAxisScore`].
pub trait ScoringStrategy {
    fn name(&self) -> &'static str;

    fn score(&self, metrics: &TranscriptMetrics) -> FourAxisScore;
}

/// Simple formula with a geometric-mean total.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricScorer;

impl ScoringStrategy for GeometricScorer {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn score(&self, metrics: &TranscriptMetrics) -> FourAxisScore {
        score_four_axis(&metrics.score_inputs())
    }
}

/// Facilitator-excluded formula with an arithmetic-mean total.
#[derive(Debug, Clone, Default)]
pub struct FacilitatorExcludedScorer {
    pub facilitator: FacilitatorMode,
}

impl FacilitatorExcludedScorer {
    pub fn new(facilitator: FacilitatorMode) -> Self {
        Self { facilitator }
    }
}

impl ScoringStrategy for FacilitatorExcludedScorer {
    fn name(&self) -> &'static str {
        "facilitator_excluded"
    }

    fn score(&self, metrics: &TranscriptMetrics) -> FourAxisScore {
        score_facilitator_excluded(metrics, &self.facilitator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, usize)]) -> Vec<SpeakerCount> {
        entries
            .iter()
            .map(|(speaker, utterances)| SpeakerCount {
                speaker: speaker.to_string(),
                utterances: *utterances,
            })
            .collect()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(92.5), 93.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.4999), 2.0);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }

    #[test]
    fn test_midpoint_inputs() {
        // every sigmoid sits at its midpoint, P lands on a .5 tie
        let score = score_four_axis(&ScoreInputs {
            participants: 3.0,
            top_share_pct: 25.0,
            sources: 1.0,
            options: 2.0,
            dissent: 0.5,
            changes: 1.0,
            reason_len: 120.0,
        });

        assert_eq!(
            score,
            FourAxisScore {
                p: 93,
                i: 50,
                d: 50,
                t: 50,
                total: 58
            }
        );
    }

    #[test]
    fn test_rich_discussion() {
        let score = score_four_axis(&ScoreInputs {
            participants: 4.0,
            top_share_pct: 30.0,
            sources: 5.0,
            options: 3.0,
            dissent: 3.0,
            changes: 2.0,
            reason_len: 200.0,
        });

        assert_eq!(
            score,
            FourAxisScore {
                p: 86,
                i: 97,
                d: 81,
                t: 73,
                total: 84
            }
        );
    }

    #[test]
    fn test_single_dominant_speaker() {
        let score = score_four_axis(&ScoreInputs {
            participants: 1.0,
            top_share_pct: 100.0,
            sources: 0.0,
            options: 1.0,
            dissent: 0.0,
            changes: 0.0,
            reason_len: 0.0,
        });

        assert_eq!(
            score,
            FourAxisScore {
                p: 4,
                i: 30,
                d: 31,
                t: 23,
                total: 17
            }
        );
    }

    #[test]
    fn test_facilitator_mode_parsing() {
        assert_eq!("auto".parse::<FacilitatorMode>().unwrap(), FacilitatorMode::Auto);
        assert_eq!("NONE".parse::<FacilitatorMode>().unwrap(), FacilitatorMode::Disabled);
        assert_eq!("off".parse::<FacilitatorMode>().unwrap(), FacilitatorMode::Disabled);
        assert_eq!(
            " Mami ".parse::<FacilitatorMode>().unwrap(),
            FacilitatorMode::Named("Mami".to_string())
        );
        assert!("  ".parse::<FacilitatorMode>().is_err());
    }

    #[test]
    fn test_auto_facilitator_prefers_earliest_on_tie() {
        let c = counts(&[("Mami", 2), ("Terumasa", 2)]);
        assert_eq!(
            resolve_facilitator(&c, &FacilitatorMode::Auto),
            Some("Mami".to_string())
        );

        let c = counts(&[("A", 1), (UNKNOWN_SPEAKER, 9), ("B", 3)]);
        assert_eq!(
            resolve_facilitator(&c, &FacilitatorMode::Auto),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_auto_facilitator_with_a_single_named_speaker() {
        let c = counts(&[("A", 3), (UNKNOWN_SPEAKER, 1)]);
        assert_eq!(
            resolve_facilitator(&c, &FacilitatorMode::Auto),
            Some("A".to_string())
        );

        let c = counts(&[(UNKNOWN_SPEAKER, 4)]);
        assert_eq!(resolve_facilitator(&c, &FacilitatorMode::Auto), None);
    }

    #[test]
    fn test_lone_speaker_excluded_leaves_unknown_lines() {
        let c = counts(&[("A", 3), (UNKNOWN_SPEAKER, 1)]);
        let breakdown = ParticipationBreakdown::from_counts(&c, &FacilitatorMode::Auto);

        assert_eq!(breakdown.facilitator.as_deref(), Some("A"));
        assert_eq!(breakdown.remaining_utterances, 1);
        assert_eq!(breakdown.top_share_pct, 100);
        assert_eq!(breakdown.participants, 1);
        assert_eq!(breakdown.voice_rate, 0.0);
    }

    #[test]
    fn test_unknown_named_facilitator_resolves_to_nobody() {
        let c = counts(&[("A", 5), ("B", 2)]);
        let mode = FacilitatorMode::Named("Zed".to_string());
        assert_eq!(resolve_facilitator(&c, &mode), None);
        assert_eq!(resolve_facilitator(&c, &FacilitatorMode::Disabled), None);
    }

    #[test]
    fn test_breakdown_voice_rate() {
        let c = counts(&[("Fac", 5), ("A", 6), ("B", 5), ("C", 1)]);
        let breakdown =
            ParticipationBreakdown::from_counts(&c, &FacilitatorMode::Named("Fac".into()));

        assert_eq!(breakdown.facilitator.as_deref(), Some("Fac"));
        assert_eq!(breakdown.remaining_utterances, 12);
        assert_eq!(breakdown.top_share_pct, 50);
        assert_eq!(breakdown.participants, 3);
        // C holds 1/12 of the remaining utterances, under the 10% bar
        assert!((breakdown.voice_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakdown_of_empty_counts() {
        let breakdown = ParticipationBreakdown::from_counts(&[], &FacilitatorMode::Auto);
        assert_eq!(breakdown.facilitator, None);
        assert_eq!(breakdown.top_share_pct, 0);
        assert_eq!(breakdown.participants, 1);
        assert_eq!(breakdown.voice_rate, 0.0);
    }

    #[test]
    fn test_score_serializes_axis_names() {
        let json = serde_json::to_value(FourAxisScore {
            p: 1,
            i: 2,
            d: 3,
            t: 4,
            total: 5,
        })
        .unwrap();
        assert_eq!(json["P"], 1);
        assert_eq!(json["Total"], 5);
    }
}
