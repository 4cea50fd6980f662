//! CSV-backed record storage. The flat files are the source of truth for
//! candidates, jobs, and feedback; rows are loaded fresh per request and
//! never written back. Evaluation audit artifacts are appended here too.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::models::{CandidateRow, FeedbackRow, JobRow};

const CVS_FILE: &str = "sample_cvs.csv";
const JDS_FILE: &str = "sample_jds.csv";
const FEEDBACKS_FILE: &str = "sample_feedbacks.csv";

/// Storage rooted at a data directory holding the three record files.
#[derive(Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn candidates(&self) -> Result<Vec<CandidateRow>> {
        read_rows(&self.data_dir.join(CVS_FILE))
    }

    pub fn jobs(&self) -> Result<Vec<JobRow>> {
        read_rows(&self.data_dir.join(JDS_FILE))
    }

    /// Looks a candidate up by id. `Ok(None)` covers both an absent id and a
    /// missing file — the caller treats either as a degraded (not fatal)
    /// condition.
    pub fn candidate_by_id(&self, id: &str) -> Option<CandidateRow> {
        match self.candidates() {
            Ok(rows) => rows.into_iter().find(|r| r.id == id),
            Err(e) => {
                warn!("candidate lookup failed: {e:#}");
                None
            }
        }
    }

    pub fn job_by_id(&self, id: &str) -> Option<JobRow> {
        match self.jobs() {
            Ok(rows) => rows.into_iter().find(|r| r.id == id),
            Err(e) => {
                warn!("job lookup failed: {e:#}");
                None
            }
        }
    }

    /// All feedback notes for a candidate. A missing feedback file means no
    /// feedback, not an error.
    pub fn feedbacks_for(&self, candidate_id: &str) -> Vec<String> {
        let path = self.data_dir.join(FEEDBACKS_FILE);
        if !path.exists() {
            return Vec::new();
        }
        match read_rows::<FeedbackRow>(&path) {
            Ok(rows) => rows
                .into_iter()
                .filter(|r| r.candidate_id == candidate_id)
                .map(|r| r.feedback_text)
                .filter(|t| !t.trim().is_empty())
                .collect(),
            Err(e) => {
                warn!("feedback load failed: {e:#}");
                Vec::new()
            }
        }
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T =
            record.with_context(|| format!("Malformed row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Writes one evaluation audit artifact as pretty JSON under the outputs
/// directory. Audit writes are best-effort: failure is logged and swallowed
/// so a full disk never fails a scoring request.
pub fn write_audit_artifact<T: Serialize>(outputs_dir: &Path, name: &str, value: &T) {
    let result = (|| -> Result<()> {
        fs::create_dir_all(outputs_dir)?;
        let path = outputs_dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        Ok(())
    })();
    if let Err(e) = result {
        warn!("failed to write audit artifact {name}: {e:#}");
    }
}
