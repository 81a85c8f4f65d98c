//! Career Entry Manager: the ordered, resizable list of career sub-forms.
//!
//! Entries are addressed by a stable `EntryId`; display index, element ids,
//! names and header labels are all derived from position when controls are
//! rendered. Removing an entry therefore re-indexes the rest implicitly.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::form::controls::{CareerField, EntryId};
use crate::form::duration::calculate_duration;

pub const REMOVE_CONFIRM_MESSAGE: &str = "この職務経歴を削除してもよろしいですか？";

/// Interactive yes/no prompt shown before a destructive action.
pub trait Confirmation {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The user declined the confirmation prompt.
    Declined,
    /// The last remaining entry cannot be removed.
    LastEntry,
    UnknownEntry,
}

/// Raw control values of one career sub-form.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerEntryForm {
    id: EntryId,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub duration: String,
    pub overview: String,
    pub position: String,
    pub scale_members: String,
    pub responsibilities: String,
    pub tech_environment: String,
}

impl CareerEntryForm {
    pub fn new() -> Self {
        Self {
            id: EntryId::new(),
            start_date: String::new(),
            end_date: String::new(),
            current: false,
            duration: String::new(),
            overview: String::new(),
            position: String::new(),
            scale_members: String::new(),
            responsibilities: String::new(),
            tech_environment: String::new(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn value(&self, field: CareerField) -> &str {
        match field {
            CareerField::StartDate => &self.start_date,
            CareerField::EndDate => &self.end_date,
            CareerField::CurrentJob => "",
            CareerField::Duration => &self.duration,
            CareerField::Overview => &self.overview,
            CareerField::Position => &self.position,
            CareerField::ScaleMembers => &self.scale_members,
            CareerField::Responsibilities => &self.responsibilities,
            CareerField::TechEnvironment => &self.tech_environment,
        }
    }

    /// Writes a user-editable value. The checkbox and the derived duration
    /// are not writable this way.
    pub fn set_value(&mut self, field: CareerField, value: impl Into<String>) -> bool {
        let slot = match field {
            CareerField::StartDate => &mut self.start_date,
            CareerField::EndDate if self.current => return false,
            CareerField::EndDate => &mut self.end_date,
            CareerField::CurrentJob | CareerField::Duration => return false,
            CareerField::Overview => &mut self.overview,
            CareerField::Position => &mut self.position,
            CareerField::ScaleMembers => &mut self.scale_members,
            CareerField::Responsibilities => &mut self.responsibilities,
            CareerField::TechEnvironment => &mut self.tech_environment,
        };
        *slot = value.into();
        true
    }

    /// Toggles "current": the end month is cleared and disabled while set.
    pub fn set_current(&mut self, current: bool) {
        self.current = current;
        if current {
            self.end_date.clear();
        }
    }

    /// Recomputes the derived duration; leaves it untouched when the dates
    /// do not allow a computation.
    pub fn recompute_duration(&mut self, today: NaiveDate) {
        if let Some(duration) =
            calculate_duration(&self.start_date, &self.end_date, self.current, today)
        {
            self.duration = duration;
        }
    }
}

impl Default for CareerEntryForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Header label shown above the entry at `index`.
pub fn header_label(index: usize) -> String {
    format!("職務経歴 #{}", index + 1)
}

/// Ordered career sub-forms; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerEntries {
    entries: Vec<CareerEntryForm>,
}

impl CareerEntries {
    pub fn new() -> Self {
        Self {
            entries: vec![CareerEntryForm::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CareerEntryForm> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CareerEntryForm> {
        self.entries.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn get(&self, id: EntryId) -> Option<&CareerEntryForm> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut CareerEntryForm> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&CareerEntryForm> {
        self.entries.get(index)
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Appends a blank entry at index `len` and returns its id.
    pub fn add_entry(&mut self) -> EntryId {
        let entry = CareerEntryForm::new();
        let id = entry.id;
        self.entries.push(entry);
        debug!("Added career entry {id} at index {}", self.entries.len() - 1);
        id
    }

    /// Removes an entry after confirmation. The last entry is never removed.
    pub fn remove_entry(&mut self, id: EntryId, confirmation: &mut dyn Confirmation) -> RemoveOutcome {
        let Some(index) = self.index_of(id) else {
            return RemoveOutcome::UnknownEntry;
        };
        if self.entries.len() == 1 {
            return RemoveOutcome::LastEntry;
        }
        if !confirmation.confirm(REMOVE_CONFIRM_MESSAGE) {
            return RemoveOutcome::Declined;
        }
        self.entries.remove(index);
        info!(
            "Removed career entry {id} (was #{}); {} remaining",
            index + 1,
            self.entries.len()
        );
        RemoveOutcome::Removed
    }

    /// Remove buttons are hidden while only one entry exists.
    pub fn remove_buttons_visible(&self) -> bool {
        self.entries.len() > 1
    }

    /// Resets to exactly `max(count, 1)` blank entries.
    pub fn reset(&mut self, count: usize) {
        self.entries = (0..count.max(1)).map(|_| CareerEntryForm::new()).collect();
    }
}

impl Default for CareerEntries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes() -> impl FnMut(&str) -> bool {
        |_| true
    }

    #[test]
    fn test_starts_with_one_entry_and_hidden_remove_button() {
        let entries = CareerEntries::new();
        assert_eq!(entries.len(), 1);
        assert!(!entries.remove_buttons_visible());
    }

    #[test]
    fn test_add_entry_appends_and_shows_remove_buttons() {
        let mut entries = CareerEntries::new();
        let id = entries.add_entry();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.index_of(id), Some(1));
        assert!(entries.remove_buttons_visible());
    }

    #[test]
    fn test_remove_middle_entry_keeps_order() {
        let mut entries = CareerEntries::new();
        entries.add_entry();
        entries.add_entry();
        let ids = entries.ids();

        let outcome = entries.remove_entry(ids[1], &mut yes());
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(entries.ids(), vec![ids[0], ids[2]]);
        assert_eq!(entries.index_of(ids[2]), Some(1));
    }

    #[test]
    fn test_last_entry_is_never_removed() {
        let mut entries = CareerEntries::new();
        let id = entries.ids()[0];
        let mut asked = false;
        let outcome = entries.remove_entry(id, &mut |_: &str| {
            asked = true;
            true
        });
        assert_eq!(outcome, RemoveOutcome::LastEntry);
        assert!(!asked);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_declined_confirmation_is_noop() {
        let mut entries = CareerEntries::new();
        let id = entries.add_entry();
        let mut prompt = String::new();
        let outcome = entries.remove_entry(id, &mut |msg: &str| {
            prompt = msg.to_string();
            false
        });
        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(prompt, REMOVE_CONFIRM_MESSAGE);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_unknown_entry() {
        let mut entries = CareerEntries::new();
        entries.add_entry();
        assert_eq!(
            entries.remove_entry(EntryId::new(), &mut yes()),
            RemoveOutcome::UnknownEntry
        );
    }

    #[test]
    fn test_current_clears_end_date_and_blocks_edits() {
        let mut entry = CareerEntryForm::new();
        entry.set_value(CareerField::EndDate, "2021-03");
        entry.set_current(true);
        assert!(entry.end_date.is_empty());
        assert!(!entry.set_value(CareerField::EndDate, "2022-01"));

        entry.set_current(false);
        assert!(entry.set_value(CareerField::EndDate, "2022-01"));
    }

    #[test]
    fn test_duration_is_not_user_writable() {
        let mut entry = CareerEntryForm::new();
        assert!(!entry.set_value(CareerField::Duration, "10年"));
        assert!(entry.duration.is_empty());
    }

    #[test]
    fn test_recompute_leaves_duration_without_start() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut entry = CareerEntryForm::new();
        entry.duration = "5年".to_string();
        entry.recompute_duration(today);
        assert_eq!(entry.duration, "5年");

        entry.start_date = "2023-01".to_string();
        entry.end_date = "2023-07".to_string();
        entry.recompute_duration(today);
        assert_eq!(entry.duration, "6ヶ月");
    }

    #[test]
    fn test_reset_never_goes_below_one() {
        let mut entries = CareerEntries::new();
        entries.reset(0);
        assert_eq!(entries.len(), 1);
        entries.reset(3);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_header_label_is_one_based() {
        assert_eq!(header_label(0), "職務経歴 #1");
    }
}
