//! Escaping and display formatting shared by the preview and form markup.

use crate::models::{EndDate, YearMonth};

/// Escapes `&`, `<`, `>`, `"` and `'` for interpolation into HTML.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes, then turns newlines into `<br>`. Order matters: the inserted
/// tags must not pass through the escaper.
pub fn format_multiline(raw: &str) -> String {
    escape_html(&raw.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// `2020年4月`
pub fn format_month(month: &YearMonth) -> String {
    format!("{}年{}月", month.year(), month.month())
}

/// `2020年4月`, `現在` for ongoing, empty when absent.
pub fn format_end_date(end: Option<&EndDate>) -> String {
    match end {
        Some(EndDate::Month(m)) => format_month(m),
        Some(EndDate::Current) => "現在".to_string(),
        None => String::new(),
    }
}

/// Appends a unit to an optional count, e.g. `30歳`; empty when absent or zero.
pub fn format_count(value: Option<u32>, unit: &str) -> String {
    match value {
        Some(n) if n > 0 => format!("{n}{unit}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_script_tag() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
    }

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(
            escape_html(r#"a & b "c" 'd'"#),
            "a &amp; b &quot;c&quot; &#039;d&#039;"
        );
    }

    #[test]
    fn test_escape_leaves_japanese_untouched() {
        assert_eq!(escape_html("要件定義、設計"), "要件定義、設計");
    }

    #[test]
    fn test_multiline_escapes_before_line_breaks() {
        assert_eq!(format_multiline("a<b\nc"), "a&lt;b<br>c");
        assert_eq!(format_multiline("x\r\ny"), "x<br>y");
    }

    #[test]
    fn test_multiline_does_not_double_escape_br() {
        assert_eq!(format_multiline("<br>\n"), "&lt;br&gt;<br>");
    }

    #[test]
    fn test_format_month_has_no_zero_padding() {
        let m = YearMonth::new(2020, 4).unwrap();
        assert_eq!(format_month(&m), "2020年4月");
    }

    #[test]
    fn test_format_end_date() {
        assert_eq!(format_end_date(Some(&EndDate::Current)), "現在");
        assert_eq!(format_end_date(None), "");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(Some(30), "歳"), "30歳");
        assert_eq!(format_count(None, "歳"), "");
        assert_eq!(format_count(Some(0), "名"), "");
    }
}
