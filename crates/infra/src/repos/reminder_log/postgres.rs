use super::IReminderLogRepo;
use medremind_domain::{LogStatus, ReminderLog, TimeSpan, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::{error, warn};

pub struct PostgresReminderLogRepo {
    pool: PgPool,
}

impl PostgresReminderLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderLogRaw {
    log_uid: Uuid,
    reminder_uid: Uuid,
    user_uid: Uuid,
    scheduled_for: i64,
    status: String,
    taken_at: Option<i64>,
    resolved_at: Option<i64>,
    note: Option<String>,
}

impl From<ReminderLogRaw> for ReminderLog {
    fn from(raw: ReminderLogRaw) -> Self {
        let status = raw.status.parse::<LogStatus>().unwrap_or_else(|_| {
            warn!(
                "Reminder log: {} has unknown status: {}, treating it as missed",
                raw.log_uid, raw.status
            );
            LogStatus::Missed
        });
        Self {
            id: raw.log_uid.into(),
            reminder_id: raw.reminder_uid.into(),
            user_id: raw.user_uid.into(),
            scheduled_for: raw.scheduled_for,
            status,
            taken_at: raw.taken_at,
            resolved_at: raw.resolved_at,
            note: raw.note,
        }
    }
}

#[async_trait::async_trait]
impl IReminderLogRepo for PostgresReminderLogRepo {
    async fn insert(&self, log: &ReminderLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_logs
            (log_uid, reminder_uid, user_uid, scheduled_for, status, taken_at, resolved_at, note)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id.inner_ref())
        .bind(log.reminder_id.inner_ref())
        .bind(log.user_id.inner_ref())
        .bind(log.scheduled_for)
        .bind(log.status.as_str())
        .bind(log.taken_at)
        .bind(log.resolved_at)
        .bind(&log.note)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder log: {:?}. DB returned error: {:?}",
                log, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, log_id: &ID) -> Option<ReminderLog> {
        sqlx::query_as::<_, ReminderLogRaw>(
            r#"
            SELECT * FROM reminder_logs AS l
            WHERE l.log_uid = $1
            "#,
        )
        .bind(log_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to find reminder log: {}. DB returned error: {:?}",
                log_id, e
            )
        })
        .ok()
        .flatten()
        .map(|log| log.into())
    }

    async fn delete(&self, log_id: &ID) -> Option<ReminderLog> {
        sqlx::query_as::<_, ReminderLogRaw>(
            r#"
            DELETE FROM reminder_logs AS l
            WHERE l.log_uid = $1
            RETURNING *
            "#,
        )
        .bind(log_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to delete reminder log: {}. DB returned error: {:?}",
                log_id, e
            )
        })
        .ok()
        .flatten()
        .map(|raw| raw.into())
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ReminderLog> {
        sqlx::query_as::<_, ReminderLogRaw>(
            r#"
            SELECT * FROM reminder_logs AS l
            WHERE l.reminder_uid = $1
            ORDER BY l.scheduled_for
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Unable to find logs of reminder: {}. DB returned error: {:?}",
                reminder_id, e
            );
            vec![]
        })
        .into_iter()
        .map(|log| log.into())
        .collect()
    }

    async fn find_by_user(&self, user_id: &ID, timespan: &TimeSpan) -> Vec<ReminderLog> {
        sqlx::query_as::<_, ReminderLogRaw>(
            r#"
            SELECT * FROM reminder_logs AS l
            WHERE l.user_uid = $1 AND
            l.scheduled_for >= $2 AND
            l.scheduled_for < $3
            ORDER BY l.scheduled_for
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(timespan.start())
        .bind(timespan.end())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Unable to find logs of user: {}. DB returned error: {:?}",
                user_id, e
            );
            vec![]
        })
        .into_iter()
        .map(|log| log.into())
        .collect()
    }

    async fn resolve_if_pending(
        &self,
        log_id: &ID,
        status: LogStatus,
        at: i64,
    ) -> anyhow::Result<Option<ReminderLog>> {
        if status == LogStatus::Pending {
            return Ok(None);
        }
        let taken_at = if status == LogStatus::Taken {
            Some(at)
        } else {
            None
        };
        let log = sqlx::query_as::<_, ReminderLogRaw>(
            r#"
            UPDATE reminder_logs
            SET status = $2,
            resolved_at = $3,
            taken_at = $4
            WHERE log_uid = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(log_id.inner_ref())
        .bind(status.as_str())
        .bind(at)
        .bind(taken_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to resolve reminder log: {} as {}. DB returned error: {:?}",
                log_id, status, e
            );
            e
        })?;
        Ok(log.map(|log| log.into()))
    }
}
