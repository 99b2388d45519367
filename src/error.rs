use thiserror::Error;

// Validation-time errors only. Evaluation and formatting never fail;
// they degrade to "not open" / "Hours not set" on bad data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("bad clock time (expected HH:MM): {0}")]
    BadClockTime(String),

    #[error("unknown holiday date rule: {0}")]
    UnknownDateRule(String),

    #[error("modified schedule has no periods: {0}")]
    MissingPeriods(String),
}
