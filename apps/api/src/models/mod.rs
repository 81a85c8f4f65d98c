// Data model: the skill-sheet record and its month values.

pub mod month;
pub mod sheet;

pub use month::{EndDate, MonthParseError, YearMonth, CURRENT_SENTINEL};
pub use sheet::{BasicInfo, CareerEntry, PossibleTasks, SkillSheetRecord, TaskId, NO_MARKER};
