use crate::{
    shared::entity::{Entity, ID},
    timezone::{localize, valid_coordinates},
    validation::ValidationError,
};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Declarative description of when a `Reminder` should fire.
/// Exactly one kind is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReminderSchedule {
    /// Every day at `time_of_day` in the timezone of the `Reminder`
    #[serde(rename_all = "camelCase")]
    FixedTime { time_of_day: NaiveTime },
    /// As `FixedTime` but only on the given days. An empty set means every day.
    #[serde(rename_all = "camelCase")]
    Weekly {
        time_of_day: NaiveTime,
        days_of_week: Vec<Weekday>,
    },
    /// Every `interval_hours` hours starting when it is armed
    #[serde(rename_all = "camelCase")]
    Interval { interval_hours: u32 },
    /// Fires `offset_minutes` after an external event with a matching label
    #[serde(rename_all = "camelCase")]
    EventOffset {
        event_label: String,
        offset_minutes: u32,
    },
    /// Fires when the user arrives at the coordinate. Proximity detection is
    /// done by the caller.
    #[serde(rename_all = "camelCase")]
    GeoTrigger { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    FixedTime,
    Weekly,
    Interval,
    EventOffset,
    GeoTrigger,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedTime => "fixed_time",
            Self::Weekly => "weekly",
            Self::Interval => "interval",
            Self::EventOffset => "event_offset",
            Self::GeoTrigger => "geo_trigger",
        }
    }
}

impl Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed_time" => Ok(Self::FixedTime),
            "weekly" => Ok(Self::Weekly),
            "interval" => Ok(Self::Interval),
            "event_offset" => Ok(Self::EventOffset),
            "geo_trigger" => Ok(Self::GeoTrigger),
            _ => Err(()),
        }
    }
}

/// How the scheduler should arm timers for a schedule
#[derive(Debug, Clone, PartialEq)]
pub enum TimerPlan {
    /// Sleep until the next wall clock occurrence, fire, repeat
    WallClock,
    /// Fire right away and then every `period`
    Every(Duration),
    /// Fired by an external signal, no timer is owned
    External,
}

impl ReminderSchedule {
    pub fn kind(&self) -> ScheduleKind {
        match self {
            Self::FixedTime { .. } => ScheduleKind::FixedTime,
            Self::Weekly { .. } => ScheduleKind::Weekly,
            Self::Interval { .. } => ScheduleKind::Interval,
            Self::EventOffset { .. } => ScheduleKind::EventOffset,
            Self::GeoTrigger { .. } => ScheduleKind::GeoTrigger,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Interval { interval_hours } if *interval_hours < 1 => Err(
                ValidationError::NonPositiveInterval(i64::from(*interval_hours)),
            ),
            Self::EventOffset { event_label, .. } if event_label.trim().is_empty() => {
                Err(ValidationError::EmptyEventLabel)
            }
            Self::GeoTrigger { lat, lon } if !valid_coordinates(*lat, *lon) => {
                Err(ValidationError::InvalidCoordinates(*lat, *lon))
            }
            _ => Ok(()),
        }
    }

    pub fn timer_plan(&self) -> TimerPlan {
        match self {
            Self::FixedTime { .. } | Self::Weekly { .. } => TimerPlan::WallClock,
            Self::Interval { interval_hours } => {
                TimerPlan::Every(Duration::hours(i64::from(*interval_hours)))
            }
            Self::EventOffset { .. } | Self::GeoTrigger { .. } => TimerPlan::External,
        }
    }

    /// True for a weekly schedule that has no days and therefore fires daily
    pub fn falls_back_to_daily(&self) -> bool {
        matches!(self, Self::Weekly { days_of_week, .. } if days_of_week.is_empty())
    }

    /// The first wall clock occurrence strictly after `now` in `tz`.
    /// `None` for schedules that are not wall clock driven.
    pub fn next_fire_after(&self, tz: &Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let (time_of_day, days): (&NaiveTime, &[Weekday]) = match self {
            Self::FixedTime { time_of_day } => (time_of_day, &[]),
            Self::Weekly {
                time_of_day,
                days_of_week,
            } => (time_of_day, days_of_week),
            _ => return None,
        };

        let today = now.with_timezone(tz).date_naive();
        // One extra day since today might already have passed
        (0..=7)
            .map(|offset| today + Duration::days(offset))
            .filter(|date| days.is_empty() || days.contains(&date.weekday()))
            .map(|date| localize(tz, date.and_time(*time_of_day)))
            .find(|candidate| *candidate > now)
    }
}

/// Parses `"HH:MM"` into a time of day
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| ValidationError::MalformedTime(text.to_string()))
}

/// Parses day sets like `"mon,wed"` or `"Monday Friday"`. Only the first three
/// letters of every token are looked at and unknown tokens are dropped.
pub fn parse_days_of_week(text: &str) -> Vec<Weekday> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter_map(|token| {
            let prefix = token.trim().to_lowercase().chars().take(3).collect::<String>();
            match prefix.as_str() {
                "mon" => Some(Weekday::Mon),
                "tue" => Some(Weekday::Tue),
                "wed" => Some(Weekday::Wed),
                "thu" => Some(Weekday::Thu),
                "fri" => Some(Weekday::Fri),
                "sat" => Some(Weekday::Sat),
                "sun" => Some(Weekday::Sun),
                _ => None,
            }
        })
        .sorted_by_key(|day| day.num_days_from_monday())
        .dedup()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NagPolicy {
    pub enabled: bool,
    pub interval_minutes: u32,
}

impl NagPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_minutes < 1 {
            return Err(ValidationError::NonPositiveNagInterval(i64::from(
                self.interval_minutes,
            )));
        }
        Ok(())
    }
}

/// A persistent schedule definition owned by a `User`
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    /// `None` for general reminders that are not about an `Item`
    pub item_id: Option<ID>,
    pub label: Option<String>,
    pub schedule: ReminderSchedule,
    /// Snapshot of the owner timezone at creation
    pub timezone: Tz,
    pub nag: NagPolicy,
    /// Advisory only, never enforced by the engine
    pub snooze_limit: u32,
    pub active: bool,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Reminder {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.schedule.validate()?;
        self.nag.validate()
    }

    /// The name used in notifications when there is no linked item
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("your reminder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn fixed_time_fires_today_or_tomorrow() {
        let schedule = ReminderSchedule::FixedTime {
            time_of_day: time(9, 0),
        };
        let tz = chrono_tz::UTC;

        let before = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(
            schedule.next_fire_after(&tz, before),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
        );

        // Exactly at fire time means the next one is tomorrow
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(
            schedule.next_fire_after(&tz, at),
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn weekly_mon_wed_in_moscow_follows_dst_changes() {
        let schedule = ReminderSchedule::Weekly {
            time_of_day: time(9, 0),
            days_of_week: parse_days_of_week("mon,wed"),
        };
        // Tuesday 10:00 MSK
        let now = Europe::Moscow
            .with_ymd_and_hms(2024, 3, 12, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let next = schedule.next_fire_after(&Europe::Moscow, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 13, 6, 0, 0).unwrap());
        assert_eq!(next.with_timezone(&Europe::Moscow).weekday(), Weekday::Wed);
        assert_eq!(next.with_timezone(&Europe::Moscow).hour(), 9);

        // Moscow still moved to summer time on Sunday 2010-03-28, so the
        // Monday after a Wednesday fire is one hour earlier in UTC
        let now = Europe::Moscow
            .with_ymd_and_hms(2010, 3, 24, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let next = schedule.next_fire_after(&Europe::Moscow, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2010, 3, 29, 5, 0, 0).unwrap());
        assert_eq!(next.with_timezone(&Europe::Moscow).weekday(), Weekday::Mon);
        assert_eq!(next.with_timezone(&Europe::Moscow).hour(), 9);
    }

    #[test]
    fn weekly_in_berlin_across_spring_forward() {
        let schedule = ReminderSchedule::Weekly {
            time_of_day: time(9, 0),
            days_of_week: vec![Weekday::Mon],
        };
        // Saturday before Berlin switches to summer time
        let now = Europe::Berlin
            .with_ymd_and_hms(2024, 3, 30, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let next = schedule.next_fire_after(&Europe::Berlin, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 4, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn weekly_without_days_is_daily() {
        let schedule = ReminderSchedule::Weekly {
            time_of_day: time(20, 30),
            days_of_week: Vec::new(),
        };
        assert!(schedule.falls_back_to_daily());
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 21, 0, 0).unwrap();
        assert_eq!(
            schedule.next_fire_after(&chrono_tz::UTC, now),
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 20, 30, 0).unwrap())
        );
    }

    #[test]
    fn externally_driven_kinds_have_no_wall_clock() {
        let now = Utc::now();
        let event = ReminderSchedule::EventOffset {
            event_label: "breakfast".into(),
            offset_minutes: 30,
        };
        let geo = ReminderSchedule::GeoTrigger { lat: 1.0, lon: 2.0 };
        assert_eq!(event.next_fire_after(&chrono_tz::UTC, now), None);
        assert_eq!(event.timer_plan(), TimerPlan::External);
        assert_eq!(geo.timer_plan(), TimerPlan::External);
        assert_eq!(
            ReminderSchedule::Interval { interval_hours: 6 }.timer_plan(),
            TimerPlan::Every(Duration::hours(6))
        );
    }

    #[test]
    fn it_validates_schedules() {
        assert_eq!(
            ReminderSchedule::Interval { interval_hours: 0 }.validate(),
            Err(ValidationError::NonPositiveInterval(0))
        );
        assert_eq!(
            ReminderSchedule::EventOffset {
                event_label: "  ".into(),
                offset_minutes: 0
            }
            .validate(),
            Err(ValidationError::EmptyEventLabel)
        );
        assert!(ReminderSchedule::GeoTrigger {
            lat: 120.0,
            lon: 0.0
        }
        .validate()
        .is_err());
        assert!(ReminderSchedule::EventOffset {
            event_label: "lunch".into(),
            offset_minutes: 0
        }
        .validate()
        .is_ok());
        assert!(NagPolicy {
            enabled: true,
            interval_minutes: 0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn it_parses_days_and_times() {
        assert_eq!(
            parse_days_of_week("Wed, mon,MONDAY, xyz"),
            vec![Weekday::Mon, Weekday::Wed]
        );
        assert!(parse_days_of_week("").is_empty());
        assert_eq!(parse_time_of_day("08:15"), Ok(time(8, 15)));
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("eight").is_err());
    }

    #[test]
    fn schedule_serializes_with_kind_tag() {
        let json = serde_json::to_value(&ReminderSchedule::Interval { interval_hours: 8 }).unwrap();
        assert_eq!(json["kind"], "Interval");
        assert_eq!(json["intervalHours"], 8);
    }
}
