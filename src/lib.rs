// Hours-of-operation model and evaluator for POI records.
//
// The editing UI and the POI persistence layer live elsewhere; they
// exchange plain HoursSpec values (JSON documents) with this crate and
// call the evaluator/formatter functions below.

mod error;    // Validation errors (HoursError)
mod evaluate; // is-open-now / next-open-time over the precedence chain
mod format;   // Display strings and consecutive-day grouping
mod models;   // Data shapes (HoursSpec, DaySchedule, TimeRef, ...)
mod rules;    // Holiday date-rule resolution (calendar math)

pub use error::HoursError;
pub use evaluate::{
    NextOpen, SunTimes, is_currently_open, is_currently_open_with_sun, local_now, next_open_time,
};
pub use format::{
    GroupedHours, HoursGroup, format_day_hours, format_grouped_hours, format_time, group_hours,
    hours_summary,
};
pub use models::{
    DaySchedule, DayStatus, ExceptionSchedule, HolidaySchedule, HoursSpec, OverrideStatus, Season,
    TimePeriod, TimeRef, WeekSchedule, Weekday,
};
pub use rules::resolve_date_rule;
