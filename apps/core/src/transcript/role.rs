//! Role classification using ordered regex rule groups.
//!
//! Groups are evaluated in order and the first matching group wins, so a line
//! that both closes a decision and voices agreement is a DECISION.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::rules::{compile_groups, RuleGroup, RuleGroupConfig};
use crate::error::Result;

/// Functional role of a transcript line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Closes the discussion on one option
    Decision,
    /// Sets a direction or next step without closing
    Commit,
    /// Agreement that is not itself a decision
    Consensus,
    #[default]
    None,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Decision, Role::Commit, Role::Consensus, Role::None];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Decision => "DECISION",
            Role::Commit => "COMMIT",
            Role::Consensus => "CONSENSUS",
            Role::None => "NONE",
        }
    }
}

/// Default rule groups, in priority order.
pub fn default_role_rules() -> Vec<RuleGroupConfig<Role>> {
    vec![
        RuleGroupConfig::new(
            Role::Decision,
            &[
                r"(決める|決定|採用|採択|結論)",
                r"(これでいく|これで行く|でいく|で行く)",
                r"(にする|で進める|で確定)",
            ],
        ),
        RuleGroupConfig::new(
            Role::Commit,
            &[
                r"(一旦|次は|次回|方向性|進め方)",
                r"(検討|持ち帰り|宿題)",
                r"(やってみる|試す|確認する|詰める)",
            ],
        ),
        RuleGroupConfig::new(
            Role::Consensus,
            &[
                r"(賛成|OK|了解|同意|同感)",
                r"(異論ない|それでいい|そうだね|いいと思う|たしかに)",
            ],
        ),
    ]
}

// NOTE: expect() is acceptable here, the default rules are static data
static DEFAULT_CLASSIFIER: LazyLock<RoleClassifier> = LazyLock::new(|| {
    RoleClassifier::from_rules(&default_role_rules()).expect("Invalid regex: default role rules")
});

/// Role classifier over ordered rule groups.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    groups: Vec<RuleGroup<Role>>,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleClassifier {
    /// Create a classifier with the default Japanese meeting markers
    pub fn new() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }

    /// Create a classifier from configured groups; order is priority.
    pub fn from_rules(rules: &[RuleGroupConfig<Role>]) -> Result<Self> {
        Ok(Self {
            groups: compile_groups(rules)?,
        })
    }

    pub fn classify(&self, text: &str) -> Role {
        let text = text.trim();

        self.groups
            .iter()
            .find(|group| group.is_match(text))
            .map(|group| group.tag())
            .unwrap_or(Role::None)
    }

    /// Matched fragments of the winning group, for display.
    pub fn explain<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.groups
            .iter()
            .find(|group| group.is_match(text))
            .map(|group| group.matched_fragments(text))
            .unwrap_or_default()
    }
}

/// Classify with the default rules.
pub fn infer_role(text: &str) -> Role {
    DEFAULT_CLASSIFIER.classify(text)
}
