//! Calendar date parsing for deed recording lines.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_MDY, DATE_MONTH_FIRST, DATE_YMD};
use crate::error::ExtractionError;

/// Parse the first recognizable date in a recording line.
///
/// Forms tried in order: `2023-03-15`, `03/15/2023` (month first),
/// `March 15, 2023`, `15 March 2023`. The date may be embedded in a
/// longer line.
pub fn parse_recording_date(line: &str) -> Result<NaiveDate, ExtractionError> {
    parse_ymd(line)
        .or_else(|| parse_mdy(line))
        .or_else(|| parse_month_first(line))
        .or_else(|| parse_day_first(line))
        .ok_or_else(|| ExtractionError::DateParse(line.trim().to_string()))
}

fn parse_ymd(text: &str) -> Option<NaiveDate> {
    DATE_YMD.captures_iter(text).find_map(|caps| {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_mdy(text: &str) -> Option<NaiveDate> {
    DATE_MDY.captures_iter(text).find_map(|caps| {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_month_first(text: &str) -> Option<NaiveDate> {
    DATE_MONTH_FIRST.captures_iter(text).find_map(|caps| {
        let month = month_to_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_day_first(text: &str) -> Option<NaiveDate> {
    DATE_DAY_FIRST.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_to_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() > 2 {
        return Some(year);
    }
    // Two-digit year: 00-50 -> 2000s, 51-99 -> 1900s
    Some(if year <= 50 { 2000 + year } else { 1900 + year })
}

fn month_to_number(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}
