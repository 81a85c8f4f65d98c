//! JSON export: the download filename convention and the written payload.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::models::SkillSheetRecord;

pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// `skillsheet_{YYYYMMDD}_{HHMM}.json` for the given wall-clock time.
pub fn export_filename(at: NaiveDateTime) -> String {
    format!("skillsheet_{}.json", at.format("%Y%m%d_%H%M"))
}

/// Filename for an export happening now, in local time.
pub fn export_filename_now() -> String {
    export_filename(Local::now().naive_local())
}

/// Pretty-printed JSON body of an exported record.
pub fn export_payload(record: &SkillSheetRecord) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec_pretty(record).map(Bytes::from)
}

/// A downloaded export ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub body: Bytes,
}

impl ExportedFile {
    /// Writes the file into `dir` under its export filename.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.body)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!("Saved export to {}", path.display());
        Ok(path)
    }
}
