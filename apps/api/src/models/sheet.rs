use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::models::month::{EndDate, YearMonth};

/// Default proficiency marker for a task with no rating.
pub const NO_MARKER: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSheetRecord {
    pub basic_info: BasicInfo,
    pub possible_tasks: PossibleTasks,
    pub career_history: Vec<CareerEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub name: String,
    pub kana: String,
    pub gender: String,
    #[serde(deserialize_with = "lenient_count")]
    pub age: Option<u32>,
    pub nearest_station: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub experience_years: Option<u32>,
    pub self_pr: Option<String>,
    pub main_technologies: Option<String>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerEntry {
    #[serde(
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<YearMonth>,
    #[serde(
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<EndDate>,
    pub duration: Option<String>,
    pub overview: String,
    pub position: String,
    #[serde(deserialize_with = "lenient_count")]
    pub scale_members: Option<u32>,
    pub responsibilities: String,
    pub tech_environment: Option<String>,
}

/// `null`, a missing key and `""` all mean "not entered".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountInput {
    Number(u32),
    Text(String),
}

/// Counts arrive as numbers or, from form-posted documents, as numeric
/// strings. Blank strings mean "not entered".
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<CountInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(CountInput::Number(n)) => Ok(Some(n)),
        Some(CountInput::Text(raw)) => match raw.trim() {
            "" => Ok(None),
            digits => digits.parse().map(Some).map_err(de::Error::custom),
        },
    }
}

/// The fixed fifteen work categories of the task matrix, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    CustomerNegotiation,
    ResearchAnalysis,
    RequirementDefinition,
    BasicDesign,
    DetailedDesign,
    PgDevelopment,
    UnitTest,
    IntegrationTest,
    SystemMaintenance,
    NwDesign,
    NwConstruction,
    NwOperation,
    SvDesign,
    SvConstruction,
    SvOperation,
}

impl TaskId {
    pub const ALL: [TaskId; 15] = [
        TaskId::CustomerNegotiation,
        TaskId::ResearchAnalysis,
        TaskId::RequirementDefinition,
        TaskId::BasicDesign,
        TaskId::DetailedDesign,
        TaskId::PgDevelopment,
        TaskId::UnitTest,
        TaskId::IntegrationTest,
        TaskId::SystemMaintenance,
        TaskId::NwDesign,
        TaskId::NwConstruction,
        TaskId::NwOperation,
        TaskId::SvDesign,
        TaskId::SvConstruction,
        TaskId::SvOperation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TaskId::CustomerNegotiation => "customer_negotiation",
            TaskId::ResearchAnalysis => "research_analysis",
            TaskId::RequirementDefinition => "requirement_definition",
            TaskId::BasicDesign => "basic_design",
            TaskId::DetailedDesign => "detailed_design",
            TaskId::PgDevelopment => "pg_development",
            TaskId::UnitTest => "unit_test",
            TaskId::IntegrationTest => "integration_test",
            TaskId::SystemMaintenance => "system_maintenance",
            TaskId::NwDesign => "nw_design",
            TaskId::NwConstruction => "nw_construction",
            TaskId::NwOperation => "nw_operation",
            TaskId::SvDesign => "sv_design",
            TaskId::SvConstruction => "sv_construction",
            TaskId::SvOperation => "sv_operation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskId::CustomerNegotiation => "顧客折衝",
            TaskId::ResearchAnalysis => "調査分析",
            TaskId::RequirementDefinition => "要件定義",
            TaskId::BasicDesign => "基本設計",
            TaskId::DetailedDesign => "詳細設計",
            TaskId::PgDevelopment => "PG開発",
            TaskId::UnitTest => "単体テスト",
            TaskId::IntegrationTest => "結合テスト",
            TaskId::SystemMaintenance => "システム保守",
            TaskId::NwDesign => "NW設計",
            TaskId::NwConstruction => "NW構築",
            TaskId::NwOperation => "NW運用",
            TaskId::SvDesign => "SV設計",
            TaskId::SvConstruction => "SV構築",
            TaskId::SvOperation => "SV運用",
        }
    }

    pub fn from_key(key: &str) -> Option<TaskId> {
        TaskId::ALL.into_iter().find(|t| t.key() == key)
    }
}

fn no_marker() -> String {
    NO_MARKER.to_string()
}

/// Proficiency marker per task. Unknown keys are ignored; missing keys default to `-`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossibleTasks {
    pub customer_negotiation: String,
    pub research_analysis: String,
    pub requirement_definition: String,
    pub basic_design: String,
    pub detailed_design: String,
    pub pg_development: String,
    pub unit_test: String,
    pub integration_test: String,
    pub system_maintenance: String,
    pub nw_design: String,
    pub nw_construction: String,
    pub nw_operation: String,
    pub sv_design: String,
    pub sv_construction: String,
    pub sv_operation: String,
}

impl Default for PossibleTasks {
    fn default() -> Self {
        Self {
            customer_negotiation: no_marker(),
            research_analysis: no_marker(),
            requirement_definition: no_marker(),
            basic_design: no_marker(),
            detailed_design: no_marker(),
            pg_development: no_marker(),
            unit_test: no_marker(),
            integration_test: no_marker(),
            system_maintenance: no_marker(),
            nw_design: no_marker(),
            nw_construction: no_marker(),
            nw_operation: no_marker(),
            sv_design: no_marker(),
            sv_construction: no_marker(),
            sv_operation: no_marker(),
        }
    }
}

impl PossibleTasks {
    pub fn get(&self, task: TaskId) -> &str {
        match task {
            TaskId::CustomerNegotiation => &self.customer_negotiation,
            TaskId::ResearchAnalysis => &self.research_analysis,
            TaskId::RequirementDefinition => &self.requirement_definition,
            TaskId::BasicDesign => &self.basic_design,
            TaskId::DetailedDesign => &self.detailed_design,
            TaskId::PgDevelopment => &self.pg_development,
            TaskId::UnitTest => &self.unit_test,
            TaskId::IntegrationTest => &self.integration_test,
            TaskId::SystemMaintenance => &self.system_maintenance,
            TaskId::NwDesign => &self.nw_design,
            TaskId::NwConstruction => &self.nw_construction,
            TaskId::NwOperation => &self.nw_operation,
            TaskId::SvDesign => &self.sv_design,
            TaskId::SvConstruction => &self.sv_construction,
            TaskId::SvOperation => &self.sv_operation,
        }
    }

    pub fn set(&mut self, task: TaskId, marker: impl Into<String>) {
        let slot = match task {
            TaskId::CustomerNegotiation => &mut self.customer_negotiation,
            TaskId::ResearchAnalysis => &mut self.research_analysis,
            TaskId::RequirementDefinition => &mut self.requirement_definition,
            TaskId::BasicDesign => &mut self.basic_design,
            TaskId::DetailedDesign => &mut self.detailed_design,
            TaskId::PgDevelopment => &mut self.pg_development,
            TaskId::UnitTest => &mut self.unit_test,
            TaskId::IntegrationTest => &mut self.integration_test,
            TaskId::SystemMaintenance => &mut self.system_maintenance,
            TaskId::NwDesign => &mut self.nw_design,
            TaskId::NwConstruction => &mut self.nw_construction,
            TaskId::NwOperation => &mut self.nw_operation,
            TaskId::SvDesign => &mut self.sv_design,
            TaskId::SvConstruction => &mut self.sv_construction,
            TaskId::SvOperation => &mut self.sv_operation,
        };
        *slot = marker.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_parses_to_default_record() {
        let record: SkillSheetRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, SkillSheetRecord::default());
        assert_eq!(record.possible_tasks.get(TaskId::SvOperation), "-");
    }

    #[test]
    fn test_full_record_parses_and_normalizes_dates() {
        let record: SkillSheetRecord = serde_json::from_value(json!({
            "basic_info": {
                "name": "テスト太郎",
                "kana": "テストタロウ",
                "gender": "男性",
                "age": 30,
                "experience_years": 5
            },
            "possible_tasks": { "customer_negotiation": "o", "unknown_task": "x" },
            "career_history": [{
                "start_date": "2018-04-01",
                "end_date": "2023-03-31",
                "duration": "5年",
                "overview": "プロジェクトA",
                "position": "SE",
                "scale_members": 5,
                "responsibilities": "要件定義、設計、開発"
            }]
        }))
        .unwrap();

        assert_eq!(record.basic_info.age, Some(30));
        assert_eq!(record.possible_tasks.customer_negotiation, "o");
        assert_eq!(record.possible_tasks.research_analysis, "-");

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["career_history"][0]["end_date"], "2023-03-01");
        assert_eq!(out["career_history"][0]["start_date"], "2018-04-01");
    }

    #[test]
    fn test_current_end_date_serializes_as_sentinel() {
        let entry = CareerEntry {
            start_date: YearMonth::new(2020, 6),
            end_date: Some(EndDate::Current),
            ..Default::default()
        };
        let out = serde_json::to_value(&entry).unwrap();
        assert_eq!(out["end_date"], "current");
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let res: Result<CareerEntry, _> =
            serde_json::from_value(json!({ "start_date": "yesterday" }));
        assert!(res.is_err());
    }

    #[test]
    fn test_blank_dates_are_absent() {
        let entry: CareerEntry =
            serde_json::from_value(json!({ "start_date": "", "end_date": null })).unwrap();
        assert_eq!(entry.start_date, None);
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn test_counts_accept_numeric_strings() {
        let record: SkillSheetRecord = serde_json::from_value(json!({
            "basic_info": { "age": "30", "experience_years": "" },
            "career_history": [{ "scale_members": " 5 " }, { "scale_members": 8 }]
        }))
        .unwrap();
        assert_eq!(record.basic_info.age, Some(30));
        assert_eq!(record.basic_info.experience_years, None);
        assert_eq!(record.career_history[0].scale_members, Some(5));
        assert_eq!(record.career_history[1].scale_members, Some(8));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["basic_info"]["age"], 30);
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let res: Result<BasicInfo, _> = serde_json::from_value(json!({ "age": "thirty" }));
        assert!(res.is_err());
    }

    #[test]
    fn test_task_keys_round_trip() {
        for task in TaskId::ALL {
            assert_eq!(TaskId::from_key(task.key()), Some(task));
        }
        assert_eq!(TaskId::from_key("nope"), None);
    }

    #[test]
    fn test_task_set_and_get() {
        let mut tasks = PossibleTasks::default();
        tasks.set(TaskId::UnitTest, "◎");
        assert_eq!(tasks.get(TaskId::UnitTest), "◎");
        assert_eq!(tasks.unit_test, "◎");
    }
}
