//! Duration Calculator: elapsed time between a start month and an end month
//! (or today, for an ongoing assignment), rendered as `{Y}年{M}ヶ月`.

use chrono::NaiveDate;

use crate::models::{EndDate, YearMonth};

/// Whole months from `start` to `end`. The start is taken from day 1 and an
/// explicit end month runs to its last day; `Current` substitutes `today`.
/// Returns `None` when the end precedes the start.
pub fn elapsed_months(start: YearMonth, end: EndDate, today: NaiveDate) -> Option<u32> {
    let end_date = match end {
        EndDate::Month(m) => m.last_day(),
        EndDate::Current => today,
    };
    let months = start.months_until(YearMonth::from_date(end_date));
    u32::try_from(months).ok()
}

/// `1年0ヶ月`, `11ヶ月`. The year part is omitted when zero.
pub fn format_duration(months: u32) -> String {
    let years = months / 12;
    let rest = months % 12;
    if years > 0 {
        format!("{years}年{rest}ヶ月")
    } else {
        format!("{rest}ヶ月")
    }
}

/// Computes the display string from raw month-input values.
///
/// Returns `None` (leave the field as it is) when the start is blank or
/// unparseable, when there is neither an end month nor the ongoing flag, or
/// when the range is inverted.
pub fn calculate_duration(
    start: &str,
    end: &str,
    ongoing: bool,
    today: NaiveDate,
) -> Option<String> {
    let start: YearMonth = start.parse().ok()?;
    let end = if ongoing {
        EndDate::Current
    } else {
        EndDate::Month(end.parse().ok()?)
    };
    elapsed_months(start, end, today).map(format_duration)
}
