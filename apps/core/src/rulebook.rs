//! Replaceable rule sets: role markers, link markers and scoring keywords.
//!
//! A rule book serializes to JSON so a host can ship its own vocabulary:
//!
//! ```json
//! {
//!   "roles": [{ "tag": "DECISION", "patterns": ["決定"] }],
//!   "links": [{ "tag": "REASON", "patterns": ["なので"] }],
//!   "keywords": { "info": [], "dissent": [], "alt": [], "change": [], "reason": [] }
//! }
//! ```
//!
//! Sections left out of the file fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::scoring::metrics::KeywordLists;
use crate::transcript::links::{default_link_rules, Link, LinkDetector};
use crate::transcript::role::{default_role_rules, Role, RoleClassifier};
use crate::transcript::rules::RuleGroupConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBook {
    /// Ordered role groups, first match wins
    pub roles: Vec<RuleGroupConfig<Role>>,
    pub links: Vec<RuleGroupConfig<Link>>,
    pub keywords: KeywordLists,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            roles: default_role_rules(),
            links: default_link_rules(),
            keywords: KeywordLists::default(),
        }
    }
}

impl RuleBook {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let book: RuleBook = serde_json::from_str(json)?;
        book.validate_patterns()?;
        Ok(book)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let book = Self::from_json_str(&json)?;

        info!(
            path = %path.display(),
            roles = book.roles.len(),
            links = book.links.len(),
            "Rule book loaded"
        );
        Ok(book)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn role_classifier(&self) -> Result<RoleClassifier> {
        RoleClassifier::from_rules(&self.roles)
    }

    pub fn link_detector(&self) -> Result<LinkDetector> {
        LinkDetector::from_rules(&self.links)
    }

    /// Compile every pattern once so errors surface at load time.
    fn validate_patterns(&self) -> Result<()> {
        self.role_classifier()?;
        self.link_detector()?;
        debug!("Rule book patterns compiled");
        Ok(())
    }
}
