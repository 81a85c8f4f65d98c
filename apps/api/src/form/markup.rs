//! HTML markup of the edit page, generated from `FormState::controls`.

use std::fmt::Write;

use crate::form::career::header_label;
use crate::form::controls::{ControlKey, ControlKind, FormControl};
use crate::form::state::FormState;
use crate::preview::format::escape_html;

/// Renders one control with its label and inline error message.
pub fn render_control(control: &FormControl) -> String {
    let mut html = String::from("<div class=\"form-group\">");
    let required_mark = if control.required {
        " <span class=\"required\">*</span>"
    } else {
        ""
    };
    let class = if control.is_invalid() { " class=\"invalid\"" } else { "" };
    let id = escape_html(&control.id);
    let name = control
        .name
        .as_deref()
        .map(|n| format!(" name=\"{}\"", escape_html(n)))
        .unwrap_or_default();
    let mut attrs = String::new();
    if control.required {
        attrs.push_str(" required");
    }
    if control.disabled {
        attrs.push_str(" disabled");
    }
    if control.readonly {
        attrs.push_str(" readonly");
    }
    if let Some(max) = control.max_length {
        let _ = write!(attrs, " maxlength=\"{max}\"");
    }
    let value = escape_html(&control.value);

    match &control.kind {
        ControlKind::Radio { options } => {
            let _ = write!(html, "<span class=\"label\">{}{required_mark}</span>", control.label);
            let _ = write!(html, "<div id=\"{id}\" class=\"radio-group\">");
            for option in options.iter() {
                let checked = if *option == control.value { " checked" } else { "" };
                let _ = write!(
                    html,
                    "<label><input type=\"radio\"{name} value=\"{}\"{attrs}{checked}> {}</label>",
                    escape_html(option),
                    escape_html(option),
                );
            }
            html.push_str("</div>");
        }
        ControlKind::Checkbox => {
            let checked = if control.checked { " checked" } else { "" };
            let _ = write!(
                html,
                "<label class=\"checkbox-label\" for=\"{id}\"><input type=\"checkbox\" id=\"{id}\"{name}{checked}> {}</label>",
                control.label
            );
        }
        ControlKind::TextArea => {
            let _ = write!(
                html,
                "<label for=\"{id}\">{}{required_mark}</label><textarea id=\"{id}\"{name}{class} rows=\"4\"{attrs}>{value}</textarea>",
                control.label
            );
            if let Some(count) = control.char_count() {
                let over = if count.over_limit() { " over-limit" } else { "" };
                let _ = write!(
                    html,
                    "<div class=\"char-counter\"><span id=\"{id}_count\" class=\"char-count{over}\">{}</span>/{}</div>",
                    count.len, count.max
                );
            }
        }
        kind => {
            let input_type = match kind {
                ControlKind::Month => "month",
                ControlKind::Number => "number",
                _ => "text",
            };
            let _ = write!(
                html,
                "<label for=\"{id}\">{}{required_mark}</label><input type=\"{input_type}\" id=\"{id}\"{name}{class} value=\"{value}\"{attrs}>",
                control.label
            );
        }
    }

    if let Some(error) = &control.error {
        let _ = write!(html, "<div class=\"error-message\">{}</div>", escape_html(error));
    }
    html.push_str("</div>\n");
    html
}

/// Renders the career sub-form at `index`, or `None` past the end.
pub fn render_career_entry(state: &FormState, index: usize) -> Option<String> {
    let entry = state.careers().at(index)?;
    let entry_id = entry.id();
    let remove_style = if state.careers().remove_buttons_visible() {
        ""
    } else {
        " style=\"display: none\""
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<div class=\"career-entry\" data-index=\"{index}\" data-entry-id=\"{entry_id}\">\n\
         <div class=\"career-header\"><h3>{}</h3>\
         <button type=\"button\" class=\"btn btn-danger remove-career\" data-entry-id=\"{entry_id}\"{remove_style}>削除</button></div>\n",
        header_label(index),
    );
    for control in state
        .controls()
        .iter()
        .filter(|c| matches!(c.key, ControlKey::Career(id, _) if id == entry_id))
    {
        html.push_str(&render_control(control));
    }
    html.push_str("</div>\n");
    Some(html)
}

/// Renders the whole edit form.
pub fn render_form(state: &FormState) -> String {
    let controls = state.controls();
    let mut html = String::from("<form id=\"skillsheetForm\">\n<section class=\"basic-info\">\n");
    for control in controls.iter().filter(|c| matches!(c.key, ControlKey::Basic(_))) {
        html.push_str(&render_control(control));
    }
    html.push_str("</section>\n<section class=\"possible-tasks\">\n");
    for control in controls.iter().filter(|c| matches!(c.key, ControlKey::Task(_))) {
        html.push_str(&render_control(control));
    }
    html.push_str("</section>\n<section id=\"careerEntries\">\n");
    for index in 0..state.careers().len() {
        if let Some(entry) = render_career_entry(state, index) {
            html.push_str(&entry);
        }
    }
    html.push_str("</section>\n</form>\n");
    html
}
