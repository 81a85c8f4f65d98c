//! Field Mapper: writes a `SkillSheetRecord` into form controls and reads it
//! back by scanning control names.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::form::controls::{
    parse_control_name, BasicField, CareerField, ControlName, FormControl, BASIC_SECTION,
    CAREER_SECTION, TASK_SECTION,
};
use crate::form::state::FormState;
use crate::models::{BasicInfo, CareerEntry, EndDate, SkillSheetRecord, TaskId, YearMonth};

/// Writes every known field of `record` into `state`.
///
/// The career list is resized to the record's length (minimum one entry),
/// stale annotations are cleared and each entry's duration is recomputed
/// from its dates. An uploaded duration is kept only when it cannot be
/// recomputed.
pub fn populate(state: &mut FormState, record: &SkillSheetRecord) {
    state.clear_annotations();

    let info = &record.basic_info;
    state.set_basic_value(BasicField::Name, info.name.as_str());
    state.set_basic_value(BasicField::Kana, info.kana.as_str());
    if !state.set_basic_value(BasicField::Gender, info.gender.as_str()) && !info.gender.is_empty()
    {
        debug!("Gender '{}' matches no option; keeping default", info.gender);
    }
    state.set_basic_value(BasicField::Age, count_to_input(info.age));
    state.set_basic_value(BasicField::NearestStation, opt_to_input(&info.nearest_station));
    state.set_basic_value(BasicField::ExperienceYears, count_to_input(info.experience_years));
    state.set_basic_value(BasicField::SelfPr, opt_to_input(&info.self_pr));
    state.set_basic_value(BasicField::MainTechnologies, opt_to_input(&info.main_technologies));
    state.set_basic_value(BasicField::Qualifications, opt_to_input(&info.qualifications));

    for task in TaskId::ALL {
        state.set_task_value(task, record.possible_tasks.get(task));
    }

    let today = state.today();
    let careers = state.careers_mut();
    careers.reset(record.career_history.len());
    for (form, entry) in careers.iter_mut().zip(&record.career_history) {
        form.start_date = entry
            .start_date
            .map(|m| m.to_input_value())
            .unwrap_or_default();
        match entry.end_date {
            Some(EndDate::Current) => form.set_current(true),
            Some(EndDate::Month(m)) => form.end_date = m.to_input_value(),
            None => {}
        }
        form.duration = opt_to_input(&entry.duration);
        form.overview = entry.overview.clone();
        form.position = entry.position.clone();
        form.scale_members = count_to_input(entry.scale_members);
        form.responsibilities = entry.responsibilities.clone();
        form.tech_environment = opt_to_input(&entry.tech_environment);
        form.recompute_duration(today);
    }
}

/// Reassembles a record from the current controls. Career controls are
/// grouped by the index embedded in their names and emitted in index order.
pub fn collect(state: &FormState) -> SkillSheetRecord {
    let mut record = SkillSheetRecord::default();
    let mut careers: BTreeMap<usize, CareerEntry> = BTreeMap::new();

    for control in state.controls() {
        let Some(name) = control.name.as_deref() else {
            continue;
        };
        match parse_control_name(name) {
            Some(ControlName::Flat {
                section: BASIC_SECTION,
                field,
            }) => {
                if let Some(field) = BasicField::from_key(field) {
                    apply_basic(&mut record.basic_info, field, &control);
                }
            }
            Some(ControlName::Flat {
                section: TASK_SECTION,
                field,
            }) => {
                if let Some(task) = TaskId::from_key(field) {
                    record.possible_tasks.set(task, control.value.as_str());
                }
            }
            Some(ControlName::Indexed {
                section: CAREER_SECTION,
                index,
                field,
            }) => {
                if let Some(field) = CareerField::from_key(field) {
                    apply_career(careers.entry(index).or_default(), field, &control);
                }
            }
            _ => warn!("Skipping control with unrecognized name '{name}'"),
        }
    }

    record.career_history = careers.into_values().collect();
    record
}

fn apply_basic(info: &mut BasicInfo, field: BasicField, control: &FormControl) {
    let value = control.value.as_str();
    match field {
        BasicField::Name => info.name = value.to_string(),
        BasicField::Kana => info.kana = value.to_string(),
        BasicField::Gender => info.gender = value.to_string(),
        BasicField::Age => info.age = parse_count(value),
        BasicField::NearestStation => info.nearest_station = non_blank(value),
        BasicField::ExperienceYears => info.experience_years = parse_count(value),
        BasicField::SelfPr => info.self_pr = non_blank(value),
        BasicField::MainTechnologies => info.main_technologies = non_blank(value),
        BasicField::Qualifications => info.qualifications = non_blank(value),
    }
}

fn apply_career(entry: &mut CareerEntry, field: CareerField, control: &FormControl) {
    let value = control.value.as_str();
    match field {
        CareerField::StartDate => entry.start_date = parse_month(value),
        CareerField::EndDate if control.disabled => entry.end_date = Some(EndDate::Current),
        CareerField::EndDate => entry.end_date = parse_month(value).map(EndDate::Month),
        CareerField::CurrentJob => {}
        CareerField::Duration => entry.duration = non_blank(value),
        CareerField::Overview => entry.overview = value.to_string(),
        CareerField::Position => entry.position = value.to_string(),
        CareerField::ScaleMembers => entry.scale_members = parse_count(value),
        CareerField::Responsibilities => entry.responsibilities = value.to_string(),
        CareerField::TechEnvironment => entry.tech_environment = non_blank(value),
    }
}

fn parse_month(value: &str) -> Option<YearMonth> {
    if value.trim().is_empty() {
        return None;
    }
    match value.parse() {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Dropping unparseable month value: {e}");
            None
        }
    }
}

/// Positive integer or `None`; non-numeric input is coerced to `None`
/// (the validator reports it before submission).
pub fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

fn count_to_input(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_to_input(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
