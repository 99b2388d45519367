/*
Display formatting.
Turns schedules into the strings the admin UI shows: per-day lines,
consecutive-day groups ("Mon-Fri: 9:00 AM - 5:00 PM") and the one-line
summary. Formatting never fails; bad data renders as "Hours not set".
*/

use chrono::{NaiveTime, Timelike};

use crate::models::{DaySchedule, DayStatus, HoursSpec, TimePeriod, TimeRef, Weekday};

// 12-hour clock with AM/PM; chrono's hour12 maps 00:xx to 12 AM and
// 12:xx to 12 PM.
fn twelve_hour(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
}

/// Render one time marker for display.
pub fn format_time(time_ref: &TimeRef) -> String {
    match time_ref {
        TimeRef::Fixed { time } => match time_ref.clock_time() {
            Some(t) => twelve_hour(t),
            // unparseable clock strings render verbatim
            None => time.clone(),
        },
        TimeRef::Dawn { offset: 0 } => "dawn".to_string(),
        TimeRef::Dawn { offset } => format!("dawn {:+}min", offset),
        TimeRef::Dusk { offset: 0 } => "dusk".to_string(),
        TimeRef::Dusk { offset } => format!("dusk {:+}min", offset),
        TimeRef::Appointment => "By Appointment".to_string(),
        TimeRef::Call => "Call for Hours".to_string(),
    }
}

// A marker period ("by appointment", "call") renders as the single
// marker, not an "X - X" pair.
fn format_period(period: &TimePeriod) -> String {
    match period.open {
        TimeRef::Appointment | TimeRef::Call => format_time(&period.open),
        _ => format!("{} - {}", format_time(&period.open), format_time(&period.close)),
    }
}

/// Render one day's schedule to a display string.
pub fn format_day_hours(sched: Option<&DaySchedule>) -> String {
    let Some(sched) = sched else {
        return "Hours not set".to_string();
    };
    match sched.status {
        DayStatus::Closed => "Closed".to_string(),
        DayStatus::AllDay => "24 Hours".to_string(),
        DayStatus::Appointment => match sched.periods.as_deref() {
            Some(periods) if !periods.is_empty() => join_periods(periods),
            _ => "By Appointment".to_string(),
        },
        DayStatus::Open => match sched.periods.as_deref() {
            Some(periods) if !periods.is_empty() => join_periods(periods),
            _ => "Hours not set".to_string(),
        },
    }
}

fn join_periods(periods: &[TimePeriod]) -> String {
    periods.iter().map(format_period).collect::<Vec<_>>().join(", ")
}

/// A run of consecutive weekdays sharing the same display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursGroup {
    pub days: Vec<Weekday>,
    pub hours: String,
}

/// Lazy walk over the week, Monday first, merging consecutive days with
/// identical formatted hours. Restart by calling [`group_hours`] again
/// (or cloning before iterating).
#[derive(Debug, Clone)]
pub struct GroupedHours<'a> {
    spec: &'a HoursSpec,
    next: usize,
}

impl Iterator for GroupedHours<'_> {
    type Item = HoursGroup;

    fn next(&mut self) -> Option<HoursGroup> {
        if self.next >= Weekday::ALL.len() {
            return None;
        }
        let start = self.next;
        let hours = day_line(self.spec, Weekday::ALL[start]);
        let mut end = start + 1;
        // merge forward only: non-adjacent days with the same hours stay
        // separate so the weekly reading order survives
        while end < Weekday::ALL.len() && day_line(self.spec, Weekday::ALL[end]) == hours {
            end += 1;
        }
        self.next = end;
        Some(HoursGroup { days: Weekday::ALL[start..end].to_vec(), hours })
    }
}

fn day_line(spec: &HoursSpec, day: Weekday) -> String {
    format_day_hours(spec.regular.get(&day))
}

/// Group the regular week for display.
pub fn group_hours(spec: &HoursSpec) -> GroupedHours<'_> {
    GroupedHours { spec, next: 0 }
}

/// One display line for a group, e.g. "Mon-Fri: 9:00 AM - 5:00 PM".
///
/// The label uses only the first and last member, so "Every day" is the
/// sole multi-day special case; Mon-Fri and Sat-Sun fall out of the
/// first-last form naturally.
pub fn format_grouped_hours(group: &HoursGroup) -> String {
    let label = match group.days.as_slice() {
        [] => return group.hours.clone(),
        [single] => single.short().to_string(),
        days if days.len() == Weekday::ALL.len() => "Every day".to_string(),
        days => format!("{}-{}", days[0].short(), days[days.len() - 1].short()),
    };
    format!("{}: {}", label, group.hours)
}

/// One-line summary of the whole week, for list views.
pub fn hours_summary(spec: &HoursSpec) -> String {
    if spec.regular.is_empty() {
        return "Hours not set".to_string();
    }
    let Some(first) = group_hours(spec).next() else {
        return "Hours not set".to_string();
    };
    if first.days.len() == Weekday::ALL.len() && first.hours == "24 Hours" {
        return "Open 24/7".to_string();
    }
    format_grouped_hours(&first)
}
