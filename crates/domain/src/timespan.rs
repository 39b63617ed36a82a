use serde::{Deserialize, Serialize};
use std::error::Error;

/// Half-open window `[start_ts, end_ts)` of millisecond timestamps used when
/// filtering the adherence ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    pub fn create(start_ts: i64, end_ts: i64) -> Result<Self, InvalidTimeSpanError> {
        if end_ts < start_ts {
            Err(InvalidTimeSpanError(start_ts, end_ts))
        } else {
            Ok(Self { start_ts, end_ts })
        }
    }

    /// The `days` long window that ends at `now_ts`
    pub fn last_days(now_ts: i64, days: u32) -> Self {
        Self {
            start_ts: now_ts - i64::from(days) * 1000 * 60 * 60 * 24,
            end_ts: now_ts,
        }
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts < self.end_ts
    }
}

#[derive(Debug)]
pub struct InvalidTimeSpanError(i64, i64);

impl Error for InvalidTimeSpanError {}

impl std::fmt::Display for InvalidTimeSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Provided timespan start_ts: {} and end_ts: {} is invalid. The end can not be before the start.",
            self.0, self.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_rejects_reversed_spans() {
        assert!(TimeSpan::create(10, 5).is_err());
        assert!(TimeSpan::create(5, 5).is_ok());
    }

    #[test]
    fn last_days_is_half_open() {
        let span = TimeSpan::last_days(1000 * 60 * 60 * 24 * 10, 7);
        assert!(span.contains(span.start()));
        assert!(!span.contains(span.end()));
        assert_eq!(span.end() - span.start(), 1000 * 60 * 60 * 24 * 7);
    }
}
