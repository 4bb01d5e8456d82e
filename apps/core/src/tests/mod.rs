//! Test Module
//!
//! Cross-module test suite for the transcript engine.
//!
//! ## Test Categories
//! - `transcript_tests`: normalization, speaker parsing, roles, links, jump events
//! - `scoring_tests`: metrics and both four-axis formulas
//! - `durability_tests`: checklist verdicts and decision navigation
//! - `integration_tests`: config, rule books, store and full workflows

pub mod durability_tests;
