//! Upload page: picks a JSON file, sends it to `/api/upload` and hands the
//! parsed record to the edit page through `skillsheetData`.

use bytes::Bytes;
use tracing::{info, warn};

use crate::client::{SkillSheetApi, TriggerControl};
use crate::models::SkillSheetRecord;
use crate::session::{SessionStore, SKILLSHEET_DATA_KEY};
use crate::views::ActionError;

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

pub const NOT_JSON_MESSAGE: &str = "JSONファイルを選択してください。";
pub const TOO_LARGE_MESSAGE: &str = "ファイルサイズは5MB以下にしてください。";
pub const UPLOAD_FAILED_MESSAGE: &str = "ファイルの読み込みに失敗しました。";

/// Rejects files the server would refuse, before any request is made.
pub fn check_file(filename: &str, size: usize) -> Result<(), ActionError> {
    if !filename.ends_with(".json") {
        warn!("Rejected non-JSON file '{filename}'");
        return Err(ActionError::InputRejected(NOT_JSON_MESSAGE));
    }
    if size > MAX_FILE_BYTES {
        warn!("Rejected '{filename}': {size} bytes exceeds limit");
        return Err(ActionError::InputRejected(TOO_LARGE_MESSAGE));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct UploadView {
    pub load_button: TriggerControl,
}

impl Default for UploadView {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadView {
    pub fn new() -> Self {
        Self {
            load_button: TriggerControl::new("ファイルから読み込み", "ファイル読み込み中..."),
        }
    }

    /// Uploads `contents` and stores the normalized record for the edit page.
    /// On success the caller navigates to the edit page.
    pub async fn load_file(
        &self,
        api: &dyn SkillSheetApi,
        session: &mut SessionStore,
        filename: &str,
        contents: Bytes,
    ) -> Result<SkillSheetRecord, ActionError> {
        check_file(filename, contents.len())?;
        let _busy = self.load_button.begin().ok_or(ActionError::Busy)?;

        let record = api
            .upload(filename, contents)
            .await
            .map_err(|e| ActionError::transport(e, UPLOAD_FAILED_MESSAGE))?;
        session.store_record(SKILLSHEET_DATA_KEY, &record)?;
        info!(
            "Loaded '{filename}' with {} career entries",
            record.career_history.len()
        );
        Ok(record)
    }
}
