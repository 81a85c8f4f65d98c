//! Preview page: renders the record handed over in `previewData`, exports it
//! as a JSON download and sends it back for editing.

use tracing::info;

use crate::client::{SkillSheetApi, TriggerControl};
use crate::export::{export_filename_now, ExportedFile};
use crate::models::SkillSheetRecord;
use crate::preview::render_loaded;
use crate::session::{SessionStore, PREVIEW_DATA_KEY, SKILLSHEET_DATA_KEY};
use crate::views::ActionError;

pub const EXPORT_FAILED_MESSAGE: &str = "JSONファイルの生成に失敗しました。";
pub const NO_DATA_MESSAGE: &str = "データが見つかりません。";

#[derive(Debug, Clone)]
pub struct PreviewView {
    /// The record being previewed, kept after the session hand-off is cleared.
    record: Option<SkillSheetRecord>,
    /// Rendered preview, or the error panel when there is nothing to show.
    pub html: String,
    pub export_button: TriggerControl,
}

impl PreviewView {
    pub fn open(session: &mut SessionStore) -> Self {
        let loaded = session.take_record::<SkillSheetRecord>(PREVIEW_DATA_KEY);
        let html = render_loaded(&loaded);
        Self {
            record: loaded.ok(),
            html,
            export_button: TriggerControl::new("JSON出力", "ファイル生成中..."),
        }
    }

    pub fn record(&self) -> Option<&SkillSheetRecord> {
        self.record.as_ref()
    }

    /// Requests the export body from `/api/export-json` and names it with
    /// the current local time.
    pub async fn export(&self, api: &dyn SkillSheetApi) -> Result<ExportedFile, ActionError> {
        let record = self
            .record
            .as_ref()
            .ok_or(ActionError::MissingData(NO_DATA_MESSAGE))?;
        let _busy = self.export_button.begin().ok_or(ActionError::Busy)?;

        let body = api
            .export_json(record)
            .await
            .map_err(|e| ActionError::transport(e, EXPORT_FAILED_MESSAGE))?;
        let file = ExportedFile {
            filename: export_filename_now(),
            body,
        };
        info!("Exported {} ({} bytes)", file.filename, file.body.len());
        Ok(file)
    }

    /// Hands the record back to the edit page. Returns false when there is
    /// nothing to hand back; the caller navigates either way.
    pub fn back_to_edit(&self, session: &mut SessionStore) -> Result<bool, ActionError> {
        match &self.record {
            Some(record) => {
                session.store_record(SKILLSHEET_DATA_KEY, record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::render::{LOAD_FAILED_MESSAGE, MISSING_DATA_MESSAGE};
    use crate::views::fake::FakeApi;

    fn session_with_preview(json: &str) -> SessionStore {
        let mut session = SessionStore::new();
        session.set_item(PREVIEW_DATA_KEY, json);
        session
    }

    #[test]
    fn test_open_renders_and_clears_hand_off() {
        let mut session = session_with_preview(r#"{"basic_info":{"name":"<b>鈴木</b>"}}"#);
        let view = PreviewView::open(&mut session);
        assert!(view.html.contains("&lt;b&gt;鈴木&lt;/b&gt;"));
        assert!(view.record().is_some());
        assert!(!session.contains(PREVIEW_DATA_KEY));
    }

    #[test]
    fn test_open_missing_and_malformed() {
        let view = PreviewView::open(&mut SessionStore::new());
        assert!(view.html.contains(MISSING_DATA_MESSAGE));
        assert!(view.record().is_none());

        let view = PreviewView::open(&mut session_with_preview("[1,"));
        assert!(view.html.contains(LOAD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_export_names_file_and_restores_button() {
        let view = PreviewView::open(&mut session_with_preview(r#"{"basic_info":{"age":30}}"#));
        let api = FakeApi {
            observed: Some(view.export_button.clone()),
            ..FakeApi::default()
        };

        let file = view.export(&api).await.unwrap();
        assert!(file.filename.starts_with("skillsheet_"));
        assert!(file.filename.ends_with(".json"));
        let parsed: SkillSheetRecord = serde_json::from_slice(&file.body).unwrap();
        assert_eq!(parsed.basic_info.age, Some(30));
        assert_eq!(view.export_button.label(), "JSON出力");
    }

    #[tokio::test]
    async fn test_export_without_data_or_with_failure() {
        let api = FakeApi::default();
        let empty = PreviewView::open(&mut SessionStore::new());
        let err = empty.export(&api).await.unwrap_err();
        assert_eq!(err.notice(), NO_DATA_MESSAGE);
        assert_eq!(api.call_count(), 0);

        let view = PreviewView::open(&mut session_with_preview("{}"));
        let api = FakeApi::failing(Some("サーバーエラー"));
        let err = view.export(&api).await.unwrap_err();
        assert_eq!(err.notice(), "サーバーエラー");
        assert!(!view.export_button.is_disabled());
    }

    #[test]
    fn test_back_to_edit_round_trips_through_editor() {
        use crate::views::EditorView;
        use chrono::NaiveDate;

        let mut session = session_with_preview(
            r#"{"basic_info":{"name":"田中"},"career_history":[{"start_date":"2019-01-01","end_date":"2020-01-01"}]}"#,
        );
        let view = PreviewView::open(&mut session);
        assert!(view.back_to_edit(&mut session).unwrap());

        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let editor = EditorView::open(&mut session, today);
        assert_eq!(
            editor.form.basic_value(crate::form::BasicField::Name),
            "田中"
        );
        let id = editor.form.careers().ids()[0];
        let entry = editor.form.careers().get(id).unwrap();
        assert_eq!(entry.value(crate::form::CareerField::Duration), "1年0ヶ月");
    }
}
