//! JSON file store for the last analyzed lines and the decision checklists.
//!
//! Two independent records live side by side in one directory:
//! `meeting_lines.json` and `meeting_checks_v1.json`. Writes report errors;
//! reads never fail and fall back to empty values on a missing or broken file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::durability::DecisionChecks;
use crate::error::Result;
use crate::transcript::lines::{check_alignment, Alignment, Line};

pub const LINES_KEY: &str = "meeting_lines";
pub const CHECKS_KEY: &str = "meeting_checks_v1";

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the store directory if missing.
    pub fn init(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            info!(dir = %self.dir.display(), "Created store directory");
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record stored under `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn write_record<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.init()?;
        let path = self.record_path(key);
        let json = serde_json::to_string(value)?;

        // write next to the target, then swap in place
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Record saved");
        Ok(())
    }

    fn read_record<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.record_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read record, using default");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Corrupt record, using default");
            T::default()
        })
    }

    pub fn save_lines(&self, lines: &[Line]) -> Result<()> {
        self.write_record(LINES_KEY, lines)
    }

    pub fn load_lines(&self) -> Vec<Line> {
        self.read_record(LINES_KEY)
    }

    pub fn save_checks(&self, checks: &DecisionChecks) -> Result<()> {
        self.write_record(CHECKS_KEY, checks)
    }

    pub fn load_checks(&self) -> DecisionChecks {
        self.read_record(CHECKS_KEY)
    }

    /// Load the checklists together with the alignment of the stored lines
    /// against `current`. A misaligned store is logged.
    pub fn load_checks_for(&self, current: &[Line]) -> (DecisionChecks, Alignment) {
        let alignment = check_alignment(&self.load_lines(), current);
        if !alignment.is_aligned() {
            warn!(alignment = ?alignment, "Stored lines differ from the current transcript");
        }
        (self.load_checks(), alignment)
    }
}
