//! Form control model: the field catalogue of the edit page and the
//! `section.field` / `section[index].field` naming convention.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::validation::utf16_len;
use crate::models::TaskId;

pub const BASIC_SECTION: &str = "basic_info";
pub const TASK_SECTION: &str = "possible_tasks";
pub const CAREER_SECTION: &str = "career_history";

pub const GENDER_OPTIONS: &[&str] = &["男性", "女性", "その他", "回答しない"];

/// Stable identity of a career entry, independent of its display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Text,
    TextArea,
    Month,
    Number,
    Radio { options: &'static [&'static str] },
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicField {
    Name,
    Kana,
    Gender,
    Age,
    NearestStation,
    ExperienceYears,
    SelfPr,
    MainTechnologies,
    Qualifications,
}

impl BasicField {
    pub const ALL: [BasicField; 9] = [
        BasicField::Name,
        BasicField::Kana,
        BasicField::Gender,
        BasicField::Age,
        BasicField::NearestStation,
        BasicField::ExperienceYears,
        BasicField::SelfPr,
        BasicField::MainTechnologies,
        BasicField::Qualifications,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BasicField::Name => "name",
            BasicField::Kana => "kana",
            BasicField::Gender => "gender",
            BasicField::Age => "age",
            BasicField::NearestStation => "nearest_station",
            BasicField::ExperienceYears => "experience_years",
            BasicField::SelfPr => "self_pr",
            BasicField::MainTechnologies => "main_technologies",
            BasicField::Qualifications => "qualifications",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BasicField::Name => "氏名",
            BasicField::Kana => "ふりがな",
            BasicField::Gender => "性別",
            BasicField::Age => "年齢",
            BasicField::NearestStation => "最寄駅",
            BasicField::ExperienceYears => "実務経験年数",
            BasicField::SelfPr => "自己PR",
            BasicField::MainTechnologies => "主要技術",
            BasicField::Qualifications => "保有資格",
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            BasicField::Gender => ControlKind::Radio {
                options: GENDER_OPTIONS,
            },
            BasicField::Age | BasicField::ExperienceYears => ControlKind::Number,
            BasicField::SelfPr | BasicField::MainTechnologies | BasicField::Qualifications => {
                ControlKind::TextArea
            }
            _ => ControlKind::Text,
        }
    }

    pub fn required(&self) -> bool {
        matches!(self, BasicField::Name | BasicField::Kana | BasicField::Gender)
    }

    /// Character limits of the free-text fields.
    pub fn max_length(&self) -> Option<usize> {
        match self {
            BasicField::SelfPr => Some(500),
            BasicField::MainTechnologies | BasicField::Qualifications => Some(200),
            _ => None,
        }
    }

    pub fn from_key(key: &str) -> Option<BasicField> {
        BasicField::ALL.into_iter().find(|f| f.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CareerField {
    StartDate,
    EndDate,
    CurrentJob,
    Duration,
    Overview,
    Position,
    ScaleMembers,
    Responsibilities,
    TechEnvironment,
}

impl CareerField {
    pub const ALL: [CareerField; 9] = [
        CareerField::StartDate,
        CareerField::EndDate,
        CareerField::CurrentJob,
        CareerField::Duration,
        CareerField::Overview,
        CareerField::Position,
        CareerField::ScaleMembers,
        CareerField::Responsibilities,
        CareerField::TechEnvironment,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CareerField::StartDate => "start_date",
            CareerField::EndDate => "end_date",
            CareerField::CurrentJob => "current_job",
            CareerField::Duration => "duration",
            CareerField::Overview => "overview",
            CareerField::Position => "position",
            CareerField::ScaleMembers => "scale_members",
            CareerField::Responsibilities => "responsibilities",
            CareerField::TechEnvironment => "tech_environment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CareerField::StartDate => "業務開始年月",
            CareerField::EndDate => "業務終了年月",
            CareerField::CurrentJob => "現在",
            CareerField::Duration => "業務期間",
            CareerField::Overview => "業務概要（及び業務内容）",
            CareerField::Position => "ポジション",
            CareerField::ScaleMembers => "規模（人数）",
            CareerField::Responsibilities => "担当業務",
            CareerField::TechEnvironment => "技術環境",
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            CareerField::StartDate | CareerField::EndDate => ControlKind::Month,
            CareerField::CurrentJob => ControlKind::Checkbox,
            CareerField::ScaleMembers => ControlKind::Number,
            CareerField::Overview | CareerField::Responsibilities | CareerField::TechEnvironment => {
                ControlKind::TextArea
            }
            CareerField::Duration | CareerField::Position => ControlKind::Text,
        }
    }

    pub fn required(&self) -> bool {
        matches!(
            self,
            CareerField::StartDate
                | CareerField::EndDate
                | CareerField::Overview
                | CareerField::Position
                | CareerField::Responsibilities
        )
    }

    /// The "current" checkbox only drives UI state and carries no name.
    pub fn is_named(&self) -> bool {
        !matches!(self, CareerField::CurrentJob)
    }

    pub fn from_key(key: &str) -> Option<CareerField> {
        CareerField::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Identity of a control in form state. Career controls are keyed by entry id,
/// so annotations survive re-indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Basic(BasicField),
    Task(TaskId),
    Career(EntryId, CareerField),
}

/// A rendered control: position-derived `id`/`name` plus its current state.
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub key: ControlKey,
    pub id: String,
    pub name: Option<String>,
    pub label: &'static str,
    pub kind: ControlKind,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub max_length: Option<usize>,
    pub error: Option<String>,
}

/// Live length of a limited control, counted like the validator counts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub len: usize,
    pub max: usize,
}

impl CharCount {
    pub fn over_limit(&self) -> bool {
        self.len > self.max
    }
}

impl FormControl {
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Counter shown beside controls that carry a `maxlength`.
    pub fn char_count(&self) -> Option<CharCount> {
        self.max_length.map(|max| CharCount {
            len: utf16_len(&self.value),
            max,
        })
    }
}

/// Element id of a career control at a display index, e.g. `start_date_0`.
pub fn career_control_id(field: CareerField, index: usize) -> String {
    format!("{}_{index}", field.key())
}

/// Name attribute of a career control at a display index.
pub fn career_control_name(field: CareerField, index: usize) -> String {
    format!("{CAREER_SECTION}[{index}].{}", field.key())
}

/// A parsed `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlName<'a> {
    Flat {
        section: &'a str,
        field: &'a str,
    },
    Indexed {
        section: &'a str,
        index: usize,
        field: &'a str,
    },
}

/// Parses `section.field` or `section[index].field`.
pub fn parse_control_name(name: &str) -> Option<ControlName<'_>> {
    let (head, field) = name.rsplit_once('.')?;
    if field.is_empty() {
        return None;
    }
    match head.split_once('[') {
        Some((section, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some(ControlName::Indexed {
                section,
                index,
                field,
            })
        }
        None => Some(ControlName::Flat {
            section: head,
            field,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_name() {
        assert_eq!(
            parse_control_name("basic_info.self_pr"),
            Some(ControlName::Flat {
                section: "basic_info",
                field: "self_pr"
            })
        );
    }

    #[test]
    fn test_parse_indexed_name() {
        assert_eq!(
            parse_control_name("career_history[12].position"),
            Some(ControlName::Indexed {
                section: "career_history",
                index: 12,
                field: "position"
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(parse_control_name("position"), None);
        assert_eq!(parse_control_name("career_history[x].position"), None);
        assert_eq!(parse_control_name("career_history[1.position"), None);
        assert_eq!(parse_control_name("basic_info."), None);
    }

    #[test]
    fn test_career_naming_convention() {
        assert_eq!(career_control_id(CareerField::ScaleMembers, 2), "scale_members_2");
        assert_eq!(
            career_control_name(CareerField::EndDate, 0),
            "career_history[0].end_date"
        );
    }

    #[test]
    fn test_char_count_only_for_limited_controls() {
        let state = crate::form::FormState::new();
        let self_pr = state.control("self_pr").unwrap();
        assert_eq!(self_pr.char_count(), Some(CharCount { len: 0, max: 500 }));
        assert_eq!(state.control("name").unwrap().char_count(), None);
    }

    #[test]
    fn test_field_catalogue_keys_are_unique() {
        for f in BasicField::ALL {
            assert_eq!(BasicField::from_key(f.key()), Some(f));
        }
        for f in CareerField::ALL {
            assert_eq!(CareerField::from_key(f.key()), Some(f));
        }
    }
}
