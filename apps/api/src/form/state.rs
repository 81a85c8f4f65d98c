//! Live state of the edit page: flat sections, the task matrix, career
//! entries and per-control error annotations.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate};

use crate::form::career::{CareerEntries, Confirmation, RemoveOutcome};
use crate::form::controls::{
    career_control_id, career_control_name, BasicField, CareerField, ControlKey, ControlKind,
    EntryId, FormControl, BASIC_SECTION, TASK_SECTION,
};
use crate::models::{TaskId, NO_MARKER};

#[derive(Debug, Clone)]
pub struct FormState {
    basic: BTreeMap<BasicField, String>,
    tasks: BTreeMap<TaskId, String>,
    careers: CareerEntries,
    errors: HashMap<ControlKey, String>,
    today: NaiveDate,
}

impl FormState {
    /// A blank form dated with the local calendar day.
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    /// A blank form whose "ongoing" durations are measured up to `today`.
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            basic: BasicField::ALL.into_iter().map(|f| (f, String::new())).collect(),
            tasks: TaskId::ALL
                .into_iter()
                .map(|t| (t, NO_MARKER.to_string()))
                .collect(),
            careers: CareerEntries::new(),
            errors: HashMap::new(),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn basic_value(&self, field: BasicField) -> &str {
        self.basic.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Sets a flat field. Radio fields accept one of their options or `""`
    /// (nothing checked) and keep their current value otherwise.
    pub fn set_basic_value(&mut self, field: BasicField, value: impl Into<String>) -> bool {
        let value = value.into();
        if let ControlKind::Radio { options } = field.kind() {
            if !value.is_empty() && !options.contains(&value.as_str()) {
                return false;
            }
        }
        self.basic.insert(field, value);
        true
    }

    pub fn task_value(&self, task: TaskId) -> &str {
        self.tasks.get(&task).map(String::as_str).unwrap_or(NO_MARKER)
    }

    pub fn set_task_value(&mut self, task: TaskId, marker: impl Into<String>) {
        self.tasks.insert(task, marker.into());
    }

    pub fn careers(&self) -> &CareerEntries {
        &self.careers
    }

    pub(crate) fn careers_mut(&mut self) -> &mut CareerEntries {
        &mut self.careers
    }

    pub fn add_career_entry(&mut self) -> EntryId {
        self.careers.add_entry()
    }

    pub fn remove_career_entry(
        &mut self,
        id: EntryId,
        confirmation: &mut dyn Confirmation,
    ) -> RemoveOutcome {
        let outcome = self.careers.remove_entry(id, confirmation);
        if outcome == RemoveOutcome::Removed {
            self.errors
                .retain(|key, _| !matches!(key, ControlKey::Career(entry, _) if *entry == id));
        }
        outcome
    }

    /// Input on a career control. Changing either date recomputes that
    /// entry's duration.
    pub fn set_career_value(
        &mut self,
        id: EntryId,
        field: CareerField,
        value: impl Into<String>,
    ) -> bool {
        let today = self.today;
        let Some(entry) = self.careers.get_mut(id) else {
            return false;
        };
        if !entry.set_value(field, value) {
            return false;
        }
        if matches!(field, CareerField::StartDate | CareerField::EndDate) {
            entry.recompute_duration(today);
        }
        true
    }

    /// Toggles the "current" checkbox of an entry and recomputes its duration.
    pub fn set_current_job(&mut self, id: EntryId, current: bool) -> bool {
        let today = self.today;
        let Some(entry) = self.careers.get_mut(id) else {
            return false;
        };
        entry.set_current(current);
        entry.recompute_duration(today);
        true
    }

    pub fn error_for(&self, key: ControlKey) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    pub(crate) fn annotate(&mut self, key: ControlKey, message: String) {
        self.errors.insert(key, message);
    }

    pub(crate) fn clear_annotation(&mut self, key: ControlKey) {
        self.errors.remove(&key);
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.errors.clear();
    }

    /// Every control of the page in document order, with ids and names
    /// derived from the current entry positions.
    pub fn controls(&self) -> Vec<FormControl> {
        let mut controls = Vec::new();

        for field in BasicField::ALL {
            let key = ControlKey::Basic(field);
            controls.push(FormControl {
                key,
                id: field.key().to_string(),
                name: Some(format!("{BASIC_SECTION}.{}", field.key())),
                label: field.label(),
                kind: field.kind(),
                value: self.basic_value(field).to_string(),
                checked: false,
                required: field.required(),
                disabled: false,
                readonly: false,
                max_length: field.max_length(),
                error: self.errors.get(&key).cloned(),
            });
        }

        for task in TaskId::ALL {
            let key = ControlKey::Task(task);
            controls.push(FormControl {
                key,
                id: task.key().to_string(),
                name: Some(format!("{TASK_SECTION}.{}", task.key())),
                label: task.label(),
                kind: ControlKind::Text,
                value: self.task_value(task).to_string(),
                checked: false,
                required: false,
                disabled: false,
                readonly: false,
                max_length: None,
                error: self.errors.get(&key).cloned(),
            });
        }

        for (index, entry) in self.careers.iter().enumerate() {
            for field in CareerField::ALL {
                let key = ControlKey::Career(entry.id(), field);
                controls.push(FormControl {
                    key,
                    id: career_control_id(field, index),
                    name: field
                        .is_named()
                        .then(|| career_control_name(field, index)),
                    label: field.label(),
                    kind: field.kind(),
                    value: entry.value(field).to_string(),
                    checked: field == CareerField::CurrentJob && entry.current,
                    required: field.required(),
                    disabled: field == CareerField::EndDate && entry.current,
                    readonly: field == CareerField::Duration,
                    max_length: None,
                    error: self.errors.get(&key).cloned(),
                });
            }
        }

        controls
    }

    /// Looks a control up by its element id.
    pub fn control(&self, id: &str) -> Option<FormControl> {
        self.controls().into_iter().find(|c| c.id == id)
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
