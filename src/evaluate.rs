/*
Open/closed evaluation.
Pure functions over an HoursSpec; never mutates its input and never
errors. Absent or malformed data falls through the precedence chain
and ultimately reads as "not open".
*/

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::format::format_time;
use crate::models::{
    DaySchedule, DayStatus, HoursSpec, OverrideStatus, Season, TimePeriod, TimeRef, Weekday,
};
use crate::rules;

/// Injected sunrise/sunset source, used to resolve dawn/dusk refs.
/// Without one, periods bounded by dawn/dusk are skipped during
/// containment checks.
pub trait SunTimes {
    /// (sunrise, sunset) for the given date, or None when unknown.
    fn sun_times(&self, date: NaiveDate) -> Option<(NaiveTime, NaiveTime)>;
}

// What the winning precedence layer decided for one date.
enum Ruling<'a> {
    Closed,
    AllDay,
    Appointment,
    Periods(&'a [TimePeriod]),
}

fn day_ruling(sched: &DaySchedule) -> Ruling<'_> {
    match sched.status {
        DayStatus::Closed => Ruling::Closed,
        DayStatus::AllDay => Ruling::AllDay,
        DayStatus::Appointment => Ruling::Appointment,
        DayStatus::Open => match sched.periods.as_deref() {
            // open with no periods: misconfigured, reads as not open
            Some(periods) if !periods.is_empty() => Ruling::Periods(periods),
            _ => Ruling::Closed,
        },
    }
}

// Walk the precedence chain for one date:
// exception > holiday > seasonal > regular.
//
// An override with status "open" and no periods means "not closed that
// day after all" and defers to the layers below it for the actual
// hours; "modified" without periods degrades to closed.
fn ruling_for(spec: &HoursSpec, date: NaiveDate) -> Ruling<'_> {
    let mut skip_holidays = false;

    // last-listed exception for the date wins
    if let Some(exception) = spec.exceptions.iter().rev().find(|e| e.date == date) {
        trace!(%date, status = ?exception.status, "exception override");
        match exception.status {
            OverrideStatus::Closed => return Ruling::Closed,
            OverrideStatus::Modified => {
                return match exception.periods.as_deref() {
                    Some(periods) if !periods.is_empty() => Ruling::Periods(periods),
                    _ => Ruling::Closed,
                };
            }
            OverrideStatus::Open => match exception.periods.as_deref() {
                Some(periods) if !periods.is_empty() => return Ruling::Periods(periods),
                _ => skip_holidays = true,
            },
        }
    }

    if !skip_holidays {
        for holiday in spec.holidays.values() {
            if rules::resolve_date_rule(&holiday.date, date.year()) != Some(date) {
                continue;
            }
            trace!(%date, holiday = %holiday.name, status = ?holiday.status, "holiday override");
            match holiday.status {
                OverrideStatus::Closed => return Ruling::Closed,
                OverrideStatus::Modified => {
                    return match holiday.periods.as_deref() {
                        Some(periods) if !periods.is_empty() => Ruling::Periods(periods),
                        _ => Ruling::Closed,
                    };
                }
                // open on the holiday: usual hours apply
                OverrideStatus::Open => break,
            }
        }
    }

    let weekday = Weekday::from_chrono(date.weekday());

    // A seasonal week replaces the regular week wholesale, so a day
    // missing from it reads as closed rather than falling back.
    let season = Season::for_month(date.month());
    if let Some(week) = spec.seasonal.get(&season) {
        trace!(%date, ?season, "seasonal week applies");
        return match week.get(&weekday) {
            Some(sched) => day_ruling(sched),
            None => Ruling::Closed,
        };
    }

    match spec.regular.get(&weekday) {
        Some(sched) => day_ruling(sched),
        None => Ruling::Closed,
    }
}

// Resolve a time ref to a clock time for one date. Symbolic dawn/dusk
// need a sun source; appointment/call never resolve.
fn resolve_ref(
    time_ref: &TimeRef,
    date: NaiveDate,
    sun: Option<&dyn SunTimes>,
) -> Option<NaiveTime> {
    match time_ref {
        TimeRef::Fixed { .. } => time_ref.clock_time(),
        TimeRef::Dawn { offset } => {
            let (sunrise, _) = sun?.sun_times(date)?;
            Some(sunrise + Duration::minutes(*offset as i64))
        }
        TimeRef::Dusk { offset } => {
            let (_, sunset) = sun?.sun_times(date)?;
            Some(sunset + Duration::minutes(*offset as i64))
        }
        TimeRef::Appointment | TimeRef::Call => None,
    }
}

// [open, close) containment. A close earlier than its open means the
// period crosses midnight.
fn period_contains(period: &TimePeriod, now: NaiveDateTime, sun: Option<&dyn SunTimes>) -> bool {
    let Some(open) = resolve_ref(&period.open, now.date(), sun) else {
        return false;
    };
    let Some(close) = resolve_ref(&period.close, now.date(), sun) else {
        return false;
    };
    let time = now.time();
    if open < close {
        time >= open && time < close
    } else if close < open {
        time >= open || time < close
    } else {
        false
    }
}

/// Is the POI open at the given local wall-clock instant?
///
/// Periods bounded by dawn/dusk are skipped; use
/// [`is_currently_open_with_sun`] to resolve them.
pub fn is_currently_open(spec: &HoursSpec, now: NaiveDateTime) -> bool {
    is_currently_open_with_sun(spec, now, None)
}

pub fn is_currently_open_with_sun(
    spec: &HoursSpec,
    now: NaiveDateTime,
    sun: Option<&dyn SunTimes>,
) -> bool {
    match ruling_for(spec, now.date()) {
        Ruling::Closed => false,
        Ruling::AllDay => true,
        // "by appointment" is never spontaneously open
        Ruling::Appointment => false,
        Ruling::Periods(periods) => periods.iter().any(|p| period_contains(p, now, sun)),
    }
}

// Convert a UTC instant into the spec's own wall clock. The stored
// timezone decides; an unknown id falls back to the default zone.
pub fn local_now(spec: &HoursSpec, utc: DateTime<Utc>) -> NaiveDateTime {
    let tz: Tz = spec
        .timezone
        .parse()
        .unwrap_or(chrono_tz::America::New_York);
    utc.with_timezone(&tz).naive_local()
}

/// The next moment the POI transitions to open, as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextOpen {
    pub day: String,  // "Today" / "Tomorrow" / short weekday name
    pub time: String, // "9:00 AM"
}

/// Scan forward up to a week (today inclusive) for the next opening,
/// consulting regular hours only. Seasonal/holiday/exception overrides
/// are deliberately not applied here; the result is a hint for display
/// ("Opens Tue 9:00 AM"), not a guarantee.
pub fn next_open_time(spec: &HoursSpec, now: NaiveDateTime) -> Option<NextOpen> {
    for ahead in 0..7i64 {
        let date = now.date() + Duration::days(ahead);
        let weekday = Weekday::from_chrono(date.weekday());
        let Some(sched) = spec.regular.get(&weekday) else {
            continue;
        };
        if sched.status != DayStatus::Open {
            continue;
        }
        let Some(first) = sched.periods.as_ref().and_then(|p| p.first()) else {
            continue;
        };
        let Some(opens_at) = first.open.clock_time() else {
            continue;
        };
        if ahead == 0 && opens_at <= now.time() {
            continue;
        }
        let day = match ahead {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => weekday.short().to_string(),
        };
        return Some(NextOpen { day, time: format_time(&first.open) });
    }
    None
}
