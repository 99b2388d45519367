use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::HoursError;
use crate::rules;

// Weekdays in display order (Monday first). BTreeMap keyed by this enum
// iterates Monday -> Sunday because of the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    // Short label used in grouped display lines ("Mon-Fri: ...")
    pub fn short(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Weekday {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    // Month -> season bucket:
    // Mar-May spring, Jun-Aug summer, Sep-Nov fall, Dec-Feb winter
    pub fn for_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Open,
    Closed,
    #[serde(rename = "24hours")]
    AllDay,
    Appointment,
}

// A symbolic or concrete time marker, tagged by "type" in JSON:
//   {"type":"fixed","time":"09:00"}
//   {"type":"dawn","offset":30}
//   {"type":"appointment"}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimeRef {
    Fixed { time: String }, // 24h "HH:MM"
    Dawn { offset: i32 },   // minutes relative to sunrise, negative = before
    Dusk { offset: i32 },   // minutes relative to sunset
    Appointment,
    Call,
}

impl TimeRef {
    pub fn fixed(hhmm: &str) -> TimeRef {
        TimeRef::Fixed { time: hhmm.to_string() }
    }

    // Concrete clock time for a fixed ref; None for symbolic refs and
    // for unparseable strings.
    pub fn clock_time(&self) -> Option<NaiveTime> {
        match self {
            TimeRef::Fixed { time } => parse_hhmm(time),
            _ => None,
        }
    }
}

// Parse a "HH:MM" string into a NaiveTime.
pub(crate) fn parse_hhmm(hhmm: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = hhmm.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let h: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

// One open/close interval within a day. A day may carry several
// (lunch break, split shifts); they are not required to be sorted or
// non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub open: TimeRef,
    pub close: TimeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>, // e.g. "kitchen closes early"
}

impl TimePeriod {
    pub fn fixed(open: &str, close: &str) -> TimePeriod {
        TimePeriod {
            open: TimeRef::fixed(open),
            close: TimeRef::fixed(close),
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub status: DayStatus,
    // Only meaningful when status is open (clock times) or appointment
    // (periods carry the appointment marker); ignored for closed/24hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<TimePeriod>>,
}

impl DaySchedule {
    pub fn closed() -> DaySchedule {
        DaySchedule { status: DayStatus::Closed, periods: None }
    }

    pub fn all_day() -> DaySchedule {
        DaySchedule { status: DayStatus::AllDay, periods: None }
    }

    pub fn open(periods: Vec<TimePeriod>) -> DaySchedule {
        DaySchedule { status: DayStatus::Open, periods: Some(periods) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    Open,
    Closed,
    Modified,
}

// Holiday override. `date` is either an "MM-DD" literal or a symbolic
// rule string such as "third_monday_january" (see rules.rs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySchedule {
    pub name: String,
    pub date: String,
    pub status: OverrideStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<TimePeriod>>, // used when status = modified
}

// One-off override for a concrete calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionSchedule {
    pub date: NaiveDate, // "YYYY-MM-DD"
    pub status: OverrideStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<TimePeriod>>, // used when status = modified
}

pub type WeekSchedule = BTreeMap<Weekday, DaySchedule>;

fn default_timezone() -> String {
    "America/New_York".to_string()
}

// Root record describing a POI's opening hours. Stored as one JSON
// document on the POI record; the evaluator only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursSpec {
    #[serde(default)]
    pub regular: WeekSchedule,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal: BTreeMap<Season, WeekSchedule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub holidays: BTreeMap<String, HolidaySchedule>,
    // Insertion order; duplicate dates allowed, last-listed wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ExceptionSchedule>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for HoursSpec {
    // Fresh spec for a new POI: every day 09:00-17:00.
    fn default() -> Self {
        let mut regular = BTreeMap::new();
        for day in Weekday::ALL {
            regular.insert(day, DaySchedule::open(vec![TimePeriod::fixed("09:00", "17:00")]));
        }
        HoursSpec {
            regular,
            seasonal: BTreeMap::new(),
            holidays: BTreeMap::new(),
            exceptions: Vec::new(),
            timezone: default_timezone(),
            notes: None,
        }
    }
}

impl HoursSpec {
    /// Check the spec for data the editing surface should not persist.
    ///
    /// The evaluator itself never errors on bad data (it degrades to
    /// "not open"); validation is where misconfiguration becomes visible.
    pub fn validate(&self) -> Result<(), HoursError> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| HoursError::UnknownTimezone(self.timezone.clone()))?;

        for sched in self.regular.values() {
            validate_day(sched)?;
        }
        for week in self.seasonal.values() {
            for sched in week.values() {
                validate_day(sched)?;
            }
        }
        for (key, holiday) in &self.holidays {
            // Probe two years so a "02-29" literal still validates.
            if rules::resolve_date_rule(&holiday.date, 2024).is_none()
                && rules::resolve_date_rule(&holiday.date, 2025).is_none()
            {
                return Err(HoursError::UnknownDateRule(holiday.date.clone()));
            }
            if holiday.status == OverrideStatus::Modified
                && holiday.periods.as_ref().is_none_or(|p| p.is_empty())
            {
                return Err(HoursError::MissingPeriods(key.clone()));
            }
            if let Some(periods) = &holiday.periods {
                validate_periods(periods)?;
            }
        }
        for exception in &self.exceptions {
            if exception.status == OverrideStatus::Modified
                && exception.periods.as_ref().is_none_or(|p| p.is_empty())
            {
                return Err(HoursError::MissingPeriods(exception.date.to_string()));
            }
            if let Some(periods) = &exception.periods {
                validate_periods(periods)?;
            }
        }
        Ok(())
    }
}

fn validate_day(sched: &DaySchedule) -> Result<(), HoursError> {
    if let Some(periods) = &sched.periods {
        validate_periods(periods)?;
    }
    Ok(())
}

fn validate_periods(periods: &[TimePeriod]) -> Result<(), HoursError> {
    for period in periods {
        for time_ref in [&period.open, &period.close] {
            if let TimeRef::Fixed { time } = time_ref {
                if parse_hhmm(time).is_none() {
                    return Err(HoursError::BadClockTime(time.clone()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_nine_to_five_every_day() {
        let spec = HoursSpec::default();
        assert_eq!(spec.regular.len(), 7);
        for day in Weekday::ALL {
            let sched = &spec.regular[&day];
            assert_eq!(sched.status, DayStatus::Open);
            assert_eq!(
                sched.periods.as_deref(),
                Some(&[TimePeriod::fixed("09:00", "17:00")][..])
            );
        }
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn season_buckets() {
        assert_eq!(Season::for_month(3), Season::Spring);
        assert_eq!(Season::for_month(7), Season::Summer);
        assert_eq!(Season::for_month(11), Season::Fall);
        assert_eq!(Season::for_month(12), Season::Winter);
        assert_eq!(Season::for_month(1), Season::Winter);
    }

    #[test]
    fn parse_hhmm_accepts_valid_rejects_garbage() {
        assert_eq!(parse_hhmm("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_hhmm("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
        assert!(parse_hhmm("24:00").is_none());
        assert!(parse_hhmm("9am").is_none());
        assert!(parse_hhmm("09:30:00").is_none());
    }

    #[test]
    fn validate_rejects_bad_clock_and_timezone() {
        let mut spec = HoursSpec::default();
        spec.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(spec.validate(), Err(HoursError::UnknownTimezone(_))));

        let mut spec = HoursSpec::default();
        spec.regular
            .insert(Weekday::Monday, DaySchedule::open(vec![TimePeriod::fixed("9am", "17:00")]));
        assert!(matches!(spec.validate(), Err(HoursError::BadClockTime(_))));
    }

    #[test]
    fn validate_requires_periods_for_modified_overrides() {
        let mut spec = HoursSpec::default();
        spec.exceptions.push(ExceptionSchedule {
            date: NaiveDate::from_ymd_opt(2026, 7, 4).unwrap(),
            status: OverrideStatus::Modified,
            reason: None,
            periods: None,
        });
        assert!(matches!(spec.validate(), Err(HoursError::MissingPeriods(_))));
    }

    #[test]
    fn weekday_map_iterates_monday_first() {
        let spec = HoursSpec::default();
        let order: Vec<Weekday> = spec.regular.keys().copied().collect();
        assert_eq!(order, Weekday::ALL.to_vec());
    }
}
