//! Preview Renderer: turns a `SkillSheetRecord` into the preview HTML fragment.
//!
//! Pure function of the record. Layout: identity table, optional free-text
//! sections, the 5-column task matrix, then one block per career entry.

use std::fmt::Write;

use tracing::error;

use crate::models::{CareerEntry, SkillSheetRecord, TaskId, NO_MARKER};
use crate::preview::format::{
    escape_html, format_count, format_end_date, format_month, format_multiline,
};
use crate::session::SessionError;

pub const MISSING_DATA_MESSAGE: &str = "プレビューデータが見つかりません。";
pub const LOAD_FAILED_MESSAGE: &str = "プレビューデータの読み込みに失敗しました。";

const TASK_COLUMNS: usize = 5;

/// Renders the full preview fragment.
pub fn render_preview(record: &SkillSheetRecord) -> String {
    let mut html = String::new();
    render_identity(&mut html, record);

    let info = &record.basic_info;
    for (title, body) in [
        ("自己PR", &info.self_pr),
        ("主要技術", &info.main_technologies),
        ("保有資格", &info.qualifications),
    ] {
        if let Some(text) = body.as_deref().filter(|t| !t.trim().is_empty()) {
            render_text_section(&mut html, title, text);
        }
    }

    render_task_matrix(&mut html, record);

    if !record.career_history.is_empty() {
        html.push_str("<div class=\"excel-section\">\n");
        html.push_str("<h3 class=\"excel-section-title\">職務経歴</h3>\n");
        for entry in &record.career_history {
            render_career_entry(&mut html, entry);
        }
        html.push_str("</div>\n");
    }

    html
}

/// Renders a record read back from the session, degrading to the error
/// panel when it is missing or malformed.
pub fn render_loaded(loaded: &Result<SkillSheetRecord, SessionError>) -> String {
    match loaded {
        Ok(record) => render_preview(record),
        Err(SessionError::Missing(_)) => render_error_panel(MISSING_DATA_MESSAGE),
        Err(err) => {
            error!("Error loading preview data: {err}");
            render_error_panel(LOAD_FAILED_MESSAGE)
        }
    }
}

pub fn render_error_panel(message: &str) -> String {
    format!("<div class=\"error\">{}</div>", escape_html(message))
}

fn render_identity(html: &mut String, record: &SkillSheetRecord) {
    let info = &record.basic_info;
    let station = info.nearest_station.as_deref().unwrap_or_default();
    let _ = write!(
        html,
        "<div class=\"excel-section\">\n\
         <h2 class=\"excel-section-title\">職務経歴書</h2>\n\
         <table class=\"excel-table\">\n\
         <tr><th>氏名</th><td>{}</td><th>ふりがな</th><td>{}</td></tr>\n\
         <tr><th>性別</th><td>{}</td><th>年齢</th><td>{}</td></tr>\n\
         <tr><th>最寄駅</th><td>{}</td><th>実務経験</th><td>{}</td></tr>\n\
         </table>\n\
         </div>\n",
        escape_html(&info.name),
        escape_html(&info.kana),
        escape_html(&info.gender),
        format_count(info.age, "歳"),
        escape_html(station),
        format_count(info.experience_years, "年"),
    );
}

fn render_text_section(html: &mut String, title: &str, body: &str) {
    let _ = write!(
        html,
        "<div class=\"excel-section\">\n\
         <h3 class=\"excel-section-title\">{title}</h3>\n\
         <div class=\"excel-merged-cell\">{}</div>\n\
         </div>\n",
        format_multiline(body),
    );
}

fn render_task_matrix(html: &mut String, record: &SkillSheetRecord) {
    html.push_str("<div class=\"excel-section\">\n");
    html.push_str("<h3 class=\"excel-section-title\">対応可能業務</h3>\n");
    html.push_str("<table class=\"task-matrix\">\n");
    for row in TaskId::ALL.chunks(TASK_COLUMNS) {
        html.push_str("<tr>");
        for task in row {
            let _ = write!(html, "<th>{}</th>", task.label());
        }
        html.push_str("</tr>\n<tr>");
        for task in row {
            let marker = record.possible_tasks.get(*task);
            let marker = if marker.trim().is_empty() { NO_MARKER } else { marker };
            let _ = write!(html, "<td>{}</td>", escape_html(marker));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</div>\n");
}

fn render_career_entry(html: &mut String, entry: &CareerEntry) {
    let start = entry.start_date.as_ref().map(format_month).unwrap_or_default();
    let end = format_end_date(entry.end_date.as_ref());
    let duration = entry.duration.as_deref().unwrap_or_default();
    let _ = write!(
        html,
        "<div class=\"career-entry-preview\">\n\
         <table class=\"career-history-table\">\n\
         <tr><th class=\"career-period\">期間</th><th class=\"career-overview\">業務概要</th>\
         <th class=\"career-position\">ポジション</th><th class=\"career-scale\">規模</th></tr>\n\
         <tr><td class=\"career-period\">{start} 〜 {end}<br>{}</td>\
         <td class=\"career-overview\">{}</td>\
         <td class=\"career-position\">{}</td>\
         <td class=\"career-scale\">{}</td></tr>\n\
         </table>\n\
         <table class=\"career-history-table\">\n\
         <tr><th>担当業務</th><td class=\"career-responsibilities\">{}</td></tr>\n\
         <tr><th>技術環境</th><td class=\"career-tech-environment\">{}</td></tr>\n\
         </table>\n\
         </div>\n",
        escape_html(duration),
        format_multiline(&entry.overview),
        escape_html(&entry.position),
        format_count(entry.scale_members, "名"),
        format_multiline(&entry.responsibilities),
        format_multiline(entry.tech_environment.as_deref().unwrap_or_default()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasicInfo, EndDate, YearMonth};

    fn sample_record() -> SkillSheetRecord {
        let mut record = SkillSheetRecord {
            basic_info: BasicInfo {
                name: "テスト太郎".to_string(),
                kana: "てすとたろう".to_string(),
                gender: "男性".to_string(),
                age: Some(30),
                nearest_station: Some("東京".to_string()),
                experience_years: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        record.possible_tasks.set(TaskId::UnitTest, "◎");
        record.career_history.push(CareerEntry {
            start_date: YearMonth::new(2020, 4),
            end_date: Some(EndDate::Current),
            duration: Some("3年2ヶ月".to_string()),
            overview: "ECサイト構築".to_string(),
            position: "SE".to_string(),
            scale_members: Some(5),
            responsibilities: "設計\n開発".to_string(),
            tech_environment: None,
        });
        record
    }

    #[test]
    fn test_identity_table_values() {
        let html = render_preview(&sample_record());
        assert!(html.contains("<td>テスト太郎</td>"));
        assert!(html.contains("<td>30歳</td>"));
        assert!(html.contains("<td>5年</td>"));
        assert!(html.contains("<td>東京</td>"));
    }

    #[test]
    fn test_script_is_escaped() {
        let mut record = sample_record();
        record.basic_info.self_pr = Some("<script>alert(1)</script>".to_string());
        let html = render_preview(&record);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_optional_sections_only_when_present() {
        let html = render_preview(&sample_record());
        assert!(!html.contains("自己PR"));
        assert!(!html.contains("主要技術"));

        let mut record = sample_record();
        record.basic_info.qualifications = Some("基本情報技術者".to_string());
        record.basic_info.main_technologies = Some("   ".to_string());
        let html = render_preview(&record);
        assert!(html.contains("保有資格"));
        assert!(html.contains("基本情報技術者"));
        assert!(!html.contains("主要技術"));
    }

    #[test]
    fn test_task_matrix_has_fifteen_cells_in_three_row_pairs() {
        let html = render_preview(&sample_record());
        let matrix_start = html.find("task-matrix").unwrap();
        let matrix = &html[matrix_start..];
        let matrix = &matrix[..matrix.find("</table>").unwrap()];
        assert_eq!(matrix.matches("<th>").count(), 15);
        assert_eq!(matrix.matches("<td>").count(), 15);
        assert_eq!(matrix.matches("<tr>").count(), 6);
        assert!(matrix.contains("<td>◎</td>"));
        assert!(matrix.contains("<td>-</td>"));
    }

    #[test]
    fn test_blank_task_marker_renders_dash() {
        let mut record = sample_record();
        record.possible_tasks.set(TaskId::NwDesign, "");
        let html = render_preview(&record);
        assert_eq!(html.matches("<td>-</td>").count(), 14);
    }

    #[test]
    fn test_career_block() {
        let html = render_preview(&sample_record());
        assert!(html.contains("2020年4月 〜 現在<br>3年2ヶ月"));
        assert!(html.contains("設計<br>開発"));
        assert!(html.contains("<td class=\"career-scale\">5名</td>"));
        assert!(html.contains("<td class=\"career-tech-environment\"></td>"));
    }

    #[test]
    fn test_missing_values_never_render_null() {
        let html = render_preview(&SkillSheetRecord::default());
        assert!(!html.contains("null"));
        assert!(!html.contains("None"));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("職務経歴</h3>"));
    }

    #[test]
    fn test_render_loaded_missing_and_malformed() {
        let missing = Err(SessionError::Missing("previewData".to_string()));
        assert!(render_loaded(&missing).contains(MISSING_DATA_MESSAGE));

        let source = serde_json::from_str::<SkillSheetRecord>("{not json").unwrap_err();
        let malformed = Err(SessionError::Malformed {
            key: "previewData".to_string(),
            source,
        });
        assert!(render_loaded(&malformed).contains(LOAD_FAILED_MESSAGE));

        assert!(render_loaded(&Ok(sample_record())).contains("職務経歴書"));
    }
}
