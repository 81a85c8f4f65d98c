//! Form Validator: required-field, length and numeric checks with inline
//! annotations.
//!
//! Disabled controls are skipped entirely; this is what exempts the end-date
//! of a "current" entry from the required rule.

use serde::Serialize;
use tracing::{debug, warn};

use crate::form::controls::{ControlKind, FormControl};
use crate::form::mapper::parse_count;
use crate::form::state::FormState;

pub const REQUIRED_MESSAGE: &str = "必須項目です";
pub const NUMBER_MESSAGE: &str = "1以上の数値を入力してください";
pub const AGGREGATE_NOTICE: &str = "入力内容に不備があります。必須項目を入力してください。";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub control_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    /// Invalid controls in document order.
    pub issues: Vec<FieldIssue>,
    /// Aggregate notice shown once when validation fails.
    pub notice: Option<String>,
}

impl ValidationReport {
    /// The control to focus and scroll to.
    pub fn first_invalid(&self) -> Option<&str> {
        self.issues.first().map(|i| i.control_id.as_str())
    }
}

/// Length as the browser's `maxlength` counts it: UTF-16 code units.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn max_length_message(max: usize) -> String {
    format!("{max}文字以内で入力してください")
}

/// Returns the message for the first rule `control` violates.
pub fn check_control(control: &FormControl) -> Option<String> {
    if control.disabled || control.readonly || control.kind == ControlKind::Checkbox {
        return None;
    }
    let blank = control.value.trim().is_empty();
    if control.required && blank {
        return Some(REQUIRED_MESSAGE.to_string());
    }
    if let Some(max) = control.max_length {
        if utf16_len(&control.value) > max {
            return Some(max_length_message(max));
        }
    }
    if control.kind == ControlKind::Number && !blank && parse_count(&control.value).is_none() {
        return Some(NUMBER_MESSAGE.to_string());
    }
    None
}

/// Validates every control, annotating failures and clearing annotations of
/// controls that now pass.
pub fn validate(state: &mut FormState) -> ValidationReport {
    let mut issues = Vec::new();

    for control in state.controls() {
        match check_control(&control) {
            Some(message) => {
                debug!("Control '{}' invalid: {message}", control.id);
                state.annotate(control.key, message.clone());
                issues.push(FieldIssue {
                    control_id: control.id,
                    message,
                });
            }
            None => state.clear_annotation(control.key),
        }
    }

    let passed = issues.is_empty();
    if !passed {
        warn!("Form validation failed with {} issue(s)", issues.len());
    }
    ValidationReport {
        passed,
        issues,
        notice: (!passed).then(|| AGGREGATE_NOTICE.to_string()),
    }
}
