//! Link detection: explicit reason / comparison / objection markers.
//!
//! Every link kind is tested independently, so a line may carry any subset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use super::rules::{compile_groups, RuleGroup, RuleGroupConfig};
use crate::error::Result;

/// Connective marker tying a line to the surrounding argument.
///
/// The declaration order is the reporting order used everywhere
/// (REASON, COMPARE, OBJECTION).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Link {
    Reason,
    Compare,
    Objection,
}

/// Links present on a line. Iterates in REASON, COMPARE, OBJECTION order.
pub type LinkSet = BTreeSet<Link>;

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Link::Reason => "REASON",
            Link::Compare => "COMPARE",
            Link::Objection => "OBJECTION",
        };
        write!(f, "{}", tag)
    }
}

impl Link {
    pub const ALL: [Link; 3] = [Link::Reason, Link::Compare, Link::Objection];

    pub fn label(&self) -> &'static str {
        match self {
            Link::Reason => "reason",
            Link::Compare => "comparison",
            Link::Objection => "objection handling",
        }
    }

    pub fn label_ja(&self) -> &'static str {
        match self {
            Link::Reason => "理由",
            Link::Compare => "比較",
            Link::Objection => "反論処理",
        }
    }
}

/// Default marker groups, one per link kind.
pub fn default_link_rules() -> Vec<RuleGroupConfig<Link>> {
    vec![
        RuleGroupConfig::new(
            Link::Reason,
            &[r"(だから|なので|ゆえに|なぜなら)", r"(理由|根拠|背景は|ため)"],
        ),
        RuleGroupConfig::new(
            Link::Compare,
            &[
                r"(一方|他方|比較|より|代わりに)",
                r"(メリット|デメリット|短期|長期)",
                r"(他の案|別案)",
            ],
        ),
        RuleGroupConfig::new(
            Link::Objection,
            &[
                r"(でも|しかし|反対)",
                r"(懸念|リスク|問題|不安|微妙|難しい)",
                r"(下がらない|デメリットは)",
            ],
        ),
    ]
}

// NOTE: expect() is acceptable here, the default rules are static data
static DEFAULT_DETECTOR: LazyLock<LinkDetector> = LazyLock::new(|| {
    LinkDetector::from_rules(&default_link_rules()).expect("Invalid regex: default link rules")
});

/// Independent per-kind link detector.
#[derive(Debug, Clone)]
pub struct LinkDetector {
    groups: Vec<RuleGroup<Link>>,
}

impl Default for LinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDetector {
    pub fn new() -> Self {
        DEFAULT_DETECTOR.clone()
    }

    pub fn from_rules(rules: &[RuleGroupConfig<Link>]) -> Result<Self> {
        Ok(Self {
            groups: compile_groups(rules)?,
        })
    }

    pub fn detect(&self, text: &str) -> LinkSet {
        let text = text.trim();

        self.groups
            .iter()
            .filter(|group| group.is_match(text))
            .map(|group| group.tag())
            .collect()
    }
}

/// Detect links with the default rules.
pub fn detect_links(text: &str) -> LinkSet {
    DEFAULT_DETECTOR.detect(text)
}
