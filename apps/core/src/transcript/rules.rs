//! Data-driven rule groups.
//!
//! A rule group is a declared tag plus an ordered list of regex patterns.
//! Classifiers hold compiled groups; configuration holds the raw strings.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, Result};

/// Raw, serializable form of a rule group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroupConfig<T> {
    pub tag: T,
    pub patterns: Vec<String>,
}

impl<T: Copy + fmt::Display> RuleGroupConfig<T> {
    pub fn new(tag: T, patterns: &[&str]) -> Self {
        Self {
            tag,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Compile every pattern, failing on the first invalid one.
    pub fn compile(&self) -> Result<RuleGroup<T>> {
        let patterns = self
            .patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| EngineError::invalid_pattern(self.tag.to_string(), e)))
            .collect::<Result<Vec<_>>>()?;

        Ok(RuleGroup {
            tag: self.tag,
            patterns,
        })
    }
}

/// Compiled rule group.
#[derive(Debug, Clone)]
pub struct RuleGroup<T> {
    tag: T,
    patterns: Vec<Regex>,
}

impl<T: Copy> RuleGroup<T> {
    pub fn tag(&self) -> T {
        self.tag
    }

    /// True when any pattern of the group matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// The first matched fragment of each matching pattern.
    pub fn matched_fragments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.patterns
            .iter()
            .filter_map(|p| p.find(text))
            .map(|m| m.as_str())
            .collect()
    }
}

/// Compile an ordered list of group configs, preserving order.
pub fn compile_groups<T: Copy + fmt::Display>(
    configs: &[RuleGroupConfig<T>],
) -> Result<Vec<RuleGroup<T>>> {
    configs.iter().map(RuleGroupConfig::compile).collect()
}
