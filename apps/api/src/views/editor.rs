//! Edit page: hydrates the form from `skillsheetData`, gates submission on
//! validation and hands the collected record to the preview page.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::client::{SkillSheetApi, TriggerControl};
use crate::form::{collect, populate, validate, FormState};
use crate::models::SkillSheetRecord;
use crate::preview::render_error_panel;
use crate::session::{SessionError, SessionStore, PREVIEW_DATA_KEY, SKILLSHEET_DATA_KEY};
use crate::views::ActionError;

pub const PREVIEW_FAILED_MESSAGE: &str = "プレビューの生成に失敗しました。";
pub const EDIT_LOAD_FAILED_MESSAGE: &str = "保存データの読み込みに失敗しました。";

#[derive(Debug, Clone)]
pub struct EditorView {
    pub form: FormState,
    pub preview_button: TriggerControl,
    /// Set when the stored hand-off could not be parsed; the form stays blank.
    pub load_error: Option<String>,
}

impl EditorView {
    /// Opens the edit page. A record waiting under `skillsheetData` is
    /// loaded into the form and cleared from the session.
    pub fn open(session: &mut SessionStore, today: NaiveDate) -> Self {
        let mut view = Self {
            form: FormState::with_today(today),
            preview_button: TriggerControl::new("プレビュー表示", "プレビュー生成中..."),
            load_error: None,
        };
        match session.take_record::<SkillSheetRecord>(SKILLSHEET_DATA_KEY) {
            Ok(record) => {
                populate(&mut view.form, &record);
                info!(
                    "Edit page hydrated with {} career entries",
                    view.form.careers().len()
                );
            }
            Err(SessionError::Missing(_)) => {}
            Err(err) => {
                warn!("Starting with a blank form: {err}");
                view.load_error = Some(EDIT_LOAD_FAILED_MESSAGE.to_string());
            }
        }
        view
    }

    /// Error panel for a failed hydration, if any.
    pub fn load_error_panel(&self) -> Option<String> {
        self.load_error.as_deref().map(render_error_panel)
    }

    /// Validates, collects and sends the form to `/api/preview`. On success
    /// the returned record is stored under `previewData` and the caller
    /// navigates to the preview page.
    pub async fn submit(
        &mut self,
        api: &dyn SkillSheetApi,
        session: &mut SessionStore,
    ) -> Result<SkillSheetRecord, ActionError> {
        let report = validate(&mut self.form);
        if !report.passed {
            return Err(ActionError::Validation { report });
        }
        let record = collect(&self.form);

        let _busy = self.preview_button.begin().ok_or(ActionError::Busy)?;
        let previewed = api
            .preview(&record)
            .await
            .map_err(|e| ActionError::transport(e, PREVIEW_FAILED_MESSAGE))?;
        session.store_record(PREVIEW_DATA_KEY, &previewed)?;
        Ok(previewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::AGGREGATE_NOTICE;
    use crate::form::{BasicField, CareerField};
    use crate::views::fake::FakeApi;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn fill_required(view: &mut EditorView) {
        let form = &mut view.form;
        form.set_basic_value(BasicField::Name, "山田太郎");
        form.set_basic_value(BasicField::Kana, "やまだたろう");
        form.set_basic_value(BasicField::Gender, "男性");
        let id = form.careers().ids()[0];
        form.set_career_value(id, CareerField::StartDate, "2021-04");
        form.set_current_job(id, true);
        form.set_career_value(id, CareerField::Overview, "ECサイト構築");
        form.set_career_value(id, CareerField::Position, "PG");
        form.set_career_value(id, CareerField::Responsibilities, "実装");
    }

    #[test]
    fn test_open_without_hand_off_is_blank() {
        let view = EditorView::open(&mut SessionStore::new(), today());
        assert_eq!(view.form.careers().len(), 1);
        assert!(view.load_error.is_none());
        assert!(view.load_error_panel().is_none());
    }

    #[test]
    fn test_open_consumes_hand_off() {
        let mut session = SessionStore::new();
        session.set_item(
            SKILLSHEET_DATA_KEY,
            r#"{"basic_info":{"name":"佐藤"},"career_history":[{},{}]}"#,
        );
        let view = EditorView::open(&mut session, today());
        assert_eq!(view.form.basic_value(BasicField::Name), "佐藤");
        assert_eq!(view.form.careers().len(), 2);
        assert!(!session.contains(SKILLSHEET_DATA_KEY));
    }

    #[test]
    fn test_open_with_malformed_hand_off() {
        let mut session = SessionStore::new();
        session.set_item(SKILLSHEET_DATA_KEY, "{not json");
        let view = EditorView::open(&mut session, today());
        assert_eq!(view.form.basic_value(BasicField::Name), "");
        assert_eq!(view.load_error.as_deref(), Some(EDIT_LOAD_FAILED_MESSAGE));
        assert!(view
            .load_error_panel()
            .unwrap()
            .contains(EDIT_LOAD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let mut view = EditorView::open(&mut SessionStore::new(), today());
        let api = FakeApi::default();
        let mut session = SessionStore::new();

        let err = view.submit(&api, &mut session).await.unwrap_err();
        match &err {
            ActionError::Validation { report } => {
                assert!(!report.passed);
                assert_eq!(report.first_invalid(), Some("name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.notice(), AGGREGATE_NOTICE);
        assert_eq!(api.call_count(), 0);
        assert!(!session.contains(PREVIEW_DATA_KEY));
    }

    #[tokio::test]
    async fn test_submit_stores_preview_data() {
        let mut view = EditorView::open(&mut SessionStore::new(), today());
        fill_required(&mut view);
        let api = FakeApi {
            observed: Some(view.preview_button.clone()),
            ..FakeApi::default()
        };
        let mut session = SessionStore::new();

        let record = view.submit(&api, &mut session).await.unwrap();
        assert_eq!(record.basic_info.name, "山田太郎");
        assert_eq!(record.career_history[0].duration.as_deref(), Some("2年11ヶ月"));
        assert!(session.contains(PREVIEW_DATA_KEY));
        assert_eq!(view.preview_button.label(), "プレビュー表示");
    }

    #[tokio::test]
    async fn test_submit_failure_restores_button() {
        let mut view = EditorView::open(&mut SessionStore::new(), today());
        fill_required(&mut view);
        let api = FakeApi::failing(None);
        let mut session = SessionStore::new();

        let err = view.submit(&api, &mut session).await.unwrap_err();
        assert_eq!(err.notice(), PREVIEW_FAILED_MESSAGE);
        assert!(!view.preview_button.is_disabled());
        assert!(!session.contains(PREVIEW_DATA_KEY));
    }
}
