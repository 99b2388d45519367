/*
Holiday date-rule resolution.
Pure calendar math, independent of the evaluator so it can be tested
against known calendar years.
*/

use chrono::{Datelike, Duration, NaiveDate, Weekday as ChronoWeekday};

/// Resolve a holiday date rule for a given year.
///
/// Accepted forms:
/// - "MM-DD" literal (e.g. "07-04")
/// - "<ordinal>_<weekday>_<month>" (e.g. "third_monday_january",
///   "last_monday_may")
/// - "easter_calculation"
/// - "day_after_thanksgiving"
///
/// Returns None for unknown rules or rules that do not occur in the
/// given year (a fifth weekday some months lack, "02-29" off leap years).
pub fn resolve_date_rule(rule: &str, year: i32) -> Option<NaiveDate> {
    if let Some(date) = parse_month_day(rule, year) {
        return Some(date);
    }

    match rule {
        "easter_calculation" => return easter(year),
        "day_after_thanksgiving" => {
            let thanksgiving = nth_weekday(year, 11, ChronoWeekday::Thu, 4)?;
            return Some(thanksgiving + Duration::days(1));
        }
        _ => {}
    }

    let parts: Vec<&str> = rule.split('_').collect();
    if parts.len() != 3 {
        return None;
    }
    let weekday = parse_weekday(parts[1])?;
    let month = parse_month(parts[2])?;
    match parts[0] {
        "last" => last_weekday(year, month, weekday),
        ordinal => {
            let n = parse_ordinal(ordinal)?;
            nth_weekday(year, month, weekday, n)
        }
    }
}

// "MM-DD" -> date in the given year
fn parse_month_day(s: &str, year: i32) -> Option<NaiveDate> {
    let (mm, dd) = s.split_once('-')?;
    if mm.len() != 2 || dd.len() != 2 {
        return None;
    }
    let month: u32 = mm.parse().ok()?;
    let day: u32 = dd.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_ordinal(s: &str) -> Option<u32> {
    match s {
        "first" => Some(1),
        "second" => Some(2),
        "third" => Some(3),
        "fourth" => Some(4),
        "fifth" => Some(5),
        _ => None,
    }
}

fn parse_weekday(s: &str) -> Option<ChronoWeekday> {
    match s {
        "monday" => Some(ChronoWeekday::Mon),
        "tuesday" => Some(ChronoWeekday::Tue),
        "wednesday" => Some(ChronoWeekday::Wed),
        "thursday" => Some(ChronoWeekday::Thu),
        "friday" => Some(ChronoWeekday::Fri),
        "saturday" => Some(ChronoWeekday::Sat),
        "sunday" => Some(ChronoWeekday::Sun),
        _ => None,
    }
}

fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

// n-th occurrence (1-based) of a weekday within a month.
fn nth_weekday(year: i32, month: u32, weekday: ChronoWeekday, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let ahead = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let date = first + Duration::days(ahead as i64 + 7 * (n as i64 - 1));
    if date.month() == month { Some(date) } else { None }
}

// Last occurrence of a weekday within a month.
fn last_weekday(year: i32, month: u32, weekday: ChronoWeekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = next_month - Duration::days(1);
    while date.weekday() != weekday {
        date -= Duration::days(1);
    }
    Some(date)
}

// Gregorian Easter Sunday (anonymous computus).
fn easter(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn literal_month_day() {
        assert_eq!(resolve_date_rule("07-04", 2026), Some(ymd(2026, 7, 4)));
        assert_eq!(resolve_date_rule("12-25", 2026), Some(ymd(2026, 12, 25)));
        // leap-day literal only exists in leap years
        assert_eq!(resolve_date_rule("02-29", 2024), Some(ymd(2024, 2, 29)));
        assert_eq!(resolve_date_rule("02-29", 2025), None);
        assert_eq!(resolve_date_rule("7-4", 2026), None);
    }

    #[test]
    fn ordinal_weekday_rules() {
        // MLK day
        assert_eq!(resolve_date_rule("third_monday_january", 2026), Some(ymd(2026, 1, 19)));
        assert_eq!(resolve_date_rule("third_monday_january", 2024), Some(ymd(2024, 1, 15)));
        // Thanksgiving
        assert_eq!(resolve_date_rule("fourth_thursday_november", 2026), Some(ymd(2026, 11, 26)));
        // Memorial day
        assert_eq!(resolve_date_rule("last_monday_may", 2026), Some(ymd(2026, 5, 25)));
        // November 2026 has five mondays but only four fridays
        assert_eq!(resolve_date_rule("fifth_monday_november", 2026), Some(ymd(2026, 11, 30)));
        assert_eq!(resolve_date_rule("fifth_friday_november", 2026), None);
    }

    #[test]
    fn day_after_thanksgiving_rule() {
        assert_eq!(resolve_date_rule("day_after_thanksgiving", 2026), Some(ymd(2026, 11, 27)));
        assert_eq!(resolve_date_rule("day_after_thanksgiving", 2024), Some(ymd(2024, 11, 29)));
    }

    #[test]
    fn easter_known_years() {
        assert_eq!(resolve_date_rule("easter_calculation", 2024), Some(ymd(2024, 3, 31)));
        assert_eq!(resolve_date_rule("easter_calculation", 2025), Some(ymd(2025, 4, 20)));
        assert_eq!(resolve_date_rule("easter_calculation", 2027), Some(ymd(2027, 3, 28)));
    }

    #[test]
    fn unknown_rules_resolve_to_none() {
        assert_eq!(resolve_date_rule("someday_maybe", 2026), None);
        assert_eq!(resolve_date_rule("third_blursday_january", 2026), None);
        assert_eq!(resolve_date_rule("", 2026), None);
    }
}
