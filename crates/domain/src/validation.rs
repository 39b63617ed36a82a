use thiserror::Error;

/// Input that was rejected before anything got persisted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Time of day: {0} is malformed, expected HH:MM")]
    MalformedTime(String),
    #[error("Timezone: {0} could not be resolved")]
    UnknownTimezone(String),
    #[error("Interval must be at least one hour, got {0}")]
    NonPositiveInterval(i64),
    #[error("Coordinates lat: {0}, lon: {1} are not valid")]
    InvalidCoordinates(f64, f64),
    #[error("Event label can not be empty")]
    EmptyEventLabel,
    #[error("Nag interval must be at least one minute, got {0}")]
    NonPositiveNagInterval(i64),
    #[error("Snooze must be at least one minute, got {0}")]
    NonPositiveSnooze(i64),
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(f64),
}
