use super::IReminderRepo;
use anyhow::anyhow;
use chrono::NaiveTime;
use chrono_tz::Tz;
use medremind_domain::{
    parse_days_of_week, NagPolicy, Reminder, ReminderSchedule, ScheduleKind, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    item_uid: Option<Uuid>,
    label: Option<String>,
    schedule_kind: String,
    time_of_day: Option<NaiveTime>,
    days_of_week: Option<String>,
    interval_hours: Option<i32>,
    event_label: Option<String>,
    offset_minutes: Option<i32>,
    geo_lat: Option<f64>,
    geo_lon: Option<f64>,
    timezone: String,
    nag_enabled: bool,
    nag_interval_minutes: i32,
    snooze_limit: i32,
    active: bool,
    created: i64,
    updated: i64,
}

/// The kind specific columns of a `ReminderSchedule`
#[derive(Default)]
struct ScheduleColumns {
    time_of_day: Option<NaiveTime>,
    days_of_week: Option<String>,
    interval_hours: Option<i32>,
    event_label: Option<String>,
    offset_minutes: Option<i32>,
    geo_lat: Option<f64>,
    geo_lon: Option<f64>,
}

impl From<&ReminderSchedule> for ScheduleColumns {
    fn from(schedule: &ReminderSchedule) -> Self {
        match schedule {
            ReminderSchedule::FixedTime { time_of_day } => Self {
                time_of_day: Some(*time_of_day),
                ..Default::default()
            },
            ReminderSchedule::Weekly {
                time_of_day,
                days_of_week,
            } => Self {
                time_of_day: Some(*time_of_day),
                days_of_week: Some(
                    days_of_week
                        .iter()
                        .map(|day| day.to_string().to_lowercase())
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                ..Default::default()
            },
            ReminderSchedule::Interval { interval_hours } => Self {
                interval_hours: Some(*interval_hours as i32),
                ..Default::default()
            },
            ReminderSchedule::EventOffset {
                event_label,
                offset_minutes,
            } => Self {
                event_label: Some(event_label.clone()),
                offset_minutes: Some(*offset_minutes as i32),
                ..Default::default()
            },
            ReminderSchedule::GeoTrigger { lat, lon } => Self {
                geo_lat: Some(*lat),
                geo_lon: Some(*lon),
                ..Default::default()
            },
        }
    }
}

fn missing(raw: &ReminderRaw, column: &str) -> anyhow::Error {
    anyhow!(
        "Reminder: {} of kind: {} is missing column: {}",
        raw.reminder_uid,
        raw.schedule_kind,
        column
    )
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        let kind = raw
            .schedule_kind
            .parse::<ScheduleKind>()
            .map_err(|_| anyhow!("Unknown schedule kind: {}", raw.schedule_kind))?;
        let schedule = match kind {
            ScheduleKind::FixedTime => ReminderSchedule::FixedTime {
                time_of_day: raw.time_of_day.ok_or_else(|| missing(&raw, "time_of_day"))?,
            },
            ScheduleKind::Weekly => ReminderSchedule::Weekly {
                time_of_day: raw.time_of_day.ok_or_else(|| missing(&raw, "time_of_day"))?,
                days_of_week: raw
                    .days_of_week
                    .as_deref()
                    .map(parse_days_of_week)
                    .unwrap_or_default(),
            },
            ScheduleKind::Interval => ReminderSchedule::Interval {
                interval_hours: raw
                    .interval_hours
                    .ok_or_else(|| missing(&raw, "interval_hours"))?
                    .try_into()?,
            },
            ScheduleKind::EventOffset => ReminderSchedule::EventOffset {
                event_label: raw
                    .event_label
                    .clone()
                    .ok_or_else(|| missing(&raw, "event_label"))?,
                offset_minutes: raw.offset_minutes.unwrap_or(0).try_into()?,
            },
            ScheduleKind::GeoTrigger => ReminderSchedule::GeoTrigger {
                lat: raw.geo_lat.ok_or_else(|| missing(&raw, "geo_lat"))?,
                lon: raw.geo_lon.ok_or_else(|| missing(&raw, "geo_lon"))?,
            },
        };
        let timezone = raw
            .timezone
            .parse::<Tz>()
            .map_err(|_| anyhow!("Unknown timezone: {}", raw.timezone))?;

        Ok(Self {
            id: raw.reminder_uid.into(),
            user_id: raw.user_uid.into(),
            item_id: raw.item_uid.map(|id| id.into()),
            label: raw.label,
            schedule,
            timezone,
            nag: NagPolicy {
                enabled: raw.nag_enabled,
                interval_minutes: raw.nag_interval_minutes.try_into()?,
            },
            snooze_limit: raw.snooze_limit.try_into()?,
            active: raw.active,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

fn into_reminders(raws: Vec<ReminderRaw>) -> Vec<Reminder> {
    raws.into_iter()
        .filter_map(|raw| match Reminder::try_from(raw) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                error!("Skipping malformed reminder row: {:?}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let columns = ScheduleColumns::from(&reminder.schedule);
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, item_uid, label, schedule_kind, time_of_day, days_of_week,
            interval_hours, event_label, offset_minutes, geo_lat, geo_lon, timezone,
            nag_enabled, nag_interval_minutes, snooze_limit, active, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.item_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&reminder.label)
        .bind(reminder.schedule.kind().as_str())
        .bind(columns.time_of_day)
        .bind(columns.days_of_week)
        .bind(columns.interval_hours)
        .bind(columns.event_label)
        .bind(columns.offset_minutes)
        .bind(columns.geo_lat)
        .bind(columns.geo_lon)
        .bind(reminder.timezone.name())
        .bind(reminder.nag.enabled)
        .bind(reminder.nag.interval_minutes as i32)
        .bind(reminder.snooze_limit as i32)
        .bind(reminder.active)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let columns = ScheduleColumns::from(&reminder.schedule);
        sqlx::query(
            r#"
            UPDATE reminders
            SET item_uid = $2,
            label = $3,
            schedule_kind = $4,
            time_of_day = $5,
            days_of_week = $6,
            interval_hours = $7,
            event_label = $8,
            offset_minutes = $9,
            geo_lat = $10,
            geo_lon = $11,
            timezone = $12,
            nag_enabled = $13,
            nag_interval_minutes = $14,
            snooze_limit = $15,
            active = $16,
            updated = $17
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.item_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&reminder.label)
        .bind(reminder.schedule.kind().as_str())
        .bind(columns.time_of_day)
        .bind(columns.days_of_week)
        .bind(columns.interval_hours)
        .bind(columns.event_label)
        .bind(columns.offset_minutes)
        .bind(columns.geo_lat)
        .bind(columns.geo_lon)
        .bind(reminder.timezone.name())
        .bind(reminder.nag.enabled)
        .bind(reminder.nag.interval_minutes as i32)
        .bind(reminder.snooze_limit as i32)
        .bind(reminder.active)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to find reminder: {}. DB returned error: {:?}",
                reminder_id, e
            )
        })
        .ok()
        .flatten()?;
        into_reminders(vec![raw]).pop()
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        let raws = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1
            ORDER BY r.created
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Unable to find reminders of user: {}. DB returned error: {:?}",
                user_id, e
            );
            vec![]
        });
        into_reminders(raws)
    }

    async fn find_active(&self) -> Vec<Reminder> {
        let raws = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.active
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find active reminders. DB returned error: {:?}", e);
            vec![]
        });
        into_reminders(raws)
    }
}
