use crate::{scheduler::Scheduler, shared::usecase::UseCase};
use medremind_domain::{Reminder, ReminderLog, ID};
use medremind_infra::{MedContext, Notification, NotificationAction};
use tracing::{error, info};

/// Snooze choices offered with every notification
pub const SNOOZE_CHOICES_MINUTES: [u32; 3] = [10, 30, 60];

/// What the notification is about: the linked item or the reminder label
pub async fn reminder_subject(reminder: &Reminder, ctx: &MedContext) -> String {
    let item = match &reminder.item_id {
        Some(item_id) => ctx.repos.items.find(item_id).await,
        None => None,
    };
    match item {
        Some(item) => item.name,
        None => reminder.display_label().to_string(),
    }
}

pub fn log_actions(log_id: &ID) -> Vec<NotificationAction> {
    let mut actions = vec![
        NotificationAction::Confirm {
            log_id: log_id.clone(),
        },
        NotificationAction::Decline {
            log_id: log_id.clone(),
        },
    ];
    actions.extend(
        SNOOZE_CHOICES_MINUTES
            .iter()
            .map(|minutes| NotificationAction::Snooze {
                log_id: log_id.clone(),
                minutes: *minutes,
            }),
    );
    actions
}

/// The firing pipeline. Runs whenever a timer of a reminder goes off.
#[derive(Debug)]
pub struct FireReminderUseCase {
    pub reminder_id: ID,
    /// Reuse this log instead of creating a new one, e.g. after a snooze
    pub log_id: Option<ID>,
    /// The instant the timer targeted, defaults to now
    pub fire_at: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub struct FiredReminder {
    pub log: ReminderLog,
    /// False when the notifier failed, the log is kept anyway
    pub notified: bool,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for FireReminderUseCase {
    /// `None` when the reminder got paused or the log was resolved in the meantime
    type Response = Option<FiredReminder>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.reminder_id.clone()))?;
        if !reminder.active {
            info!("Reminder: {} is not active anymore, skipping fire", reminder.id);
            return Ok(None);
        }

        let now = ctx.sys.get_timestamp_millis();
        let existing_log = match &self.log_id {
            Some(log_id) => ctx.repos.reminder_logs.find(log_id).await,
            None => None,
        };
        let log = match existing_log {
            Some(log) if log.reminder_id != reminder.id => {
                return Err(UseCaseErrors::NotFound(log.id));
            }
            Some(log) if !log.is_pending() => {
                info!("Log: {} is already {}, skipping fire", log.id, log.status);
                return Ok(None);
            }
            Some(log) => log,
            None => {
                let log = ReminderLog::new(&reminder, self.fire_at.unwrap_or(now));
                // A failed write aborts before anybody gets notified
                ctx.repos
                    .reminder_logs
                    .insert(&log)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                log
            }
        };

        let subject = reminder_subject(&reminder, ctx).await;
        let notification = Notification {
            text: format!("Time for {}", subject),
            actions: log_actions(&log.id),
        };
        let notified = match ctx.services.notifier.send(&reminder.user_id, &notification).await {
            Ok(_) => true,
            Err(e) => {
                error!(
                    "Unable to notify user: {} about log: {}. Error: {:?}",
                    reminder.user_id, log.id, e
                );
                false
            }
        };

        if reminder.nag.enabled {
            Scheduler::new(ctx).arm_nag(&reminder, &log.id);
        }

        Ok(Some(FiredReminder { log, notified }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medremind_domain::{Item, LogStatus, NagPolicy, ReminderSchedule};
    use medremind_infra::{InMemoryNotifier, TimerKey};
    use std::sync::Arc;

    struct TestContext {
        ctx: MedContext,
        notifier: Arc<InMemoryNotifier>,
        reminder: Reminder,
    }

    async fn setup(nag_enabled: bool) -> TestContext {
        let mut ctx = MedContext::create_inmemory();
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.services.notifier = notifier.clone();

        let mut item = Item::new(ID::new(), "Ibuprofen".into());
        item.track_stock = true;
        ctx.repos.items.insert(&item).await.unwrap();

        let reminder = Reminder {
            id: Default::default(),
            user_id: item.user_id.clone(),
            item_id: Some(item.id.clone()),
            label: None,
            schedule: ReminderSchedule::EventOffset {
                event_label: "breakfast".into(),
                offset_minutes: 0,
            },
            timezone: chrono_tz::UTC,
            nag: NagPolicy {
                enabled: nag_enabled,
                interval_minutes: 15,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        TestContext {
            ctx,
            notifier,
            reminder,
        }
    }

    fn usecase(reminder: &Reminder, log_id: Option<ID>) -> FireReminderUseCase {
        FireReminderUseCase {
            reminder_id: reminder.id.clone(),
            log_id,
            fire_at: Some(1000),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_log_notifies_and_arms_one_nag() {
        let TestContext {
            ctx,
            notifier,
            reminder,
        } = setup(true).await;

        let fired = usecase(&reminder, None)
            .execute(&ctx)
            .await
            .unwrap()
            .expect("To fire");
        assert!(fired.notified);
        assert_eq!(fired.log.status, LogStatus::Pending);
        assert_eq!(fired.log.scheduled_for, 1000);

        let sent = notifier.sent_to(&reminder.user_id);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "Time for Ibuprofen");
        assert_eq!(sent[0].actions.len(), 5);

        assert_eq!(
            ctx.timers.live_keys(&fired.log.id),
            vec![TimerKey::Nag {
                reminder_id: reminder.id.clone(),
                log_id: fired.log.id.clone()
            }]
        );
    }

    #[actix_web::main]
    #[test]
    async fn inactive_reminders_do_not_fire() {
        let TestContext {
            ctx,
            notifier,
            mut reminder,
        } = setup(true).await;
        reminder.active = false;
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let res = usecase(&reminder, None).execute(&ctx).await.unwrap();
        assert!(res.is_none());
        assert!(notifier.sent().is_empty());
        assert!(ctx
            .repos
            .reminder_logs
            .find_by_reminder(&reminder.id)
            .await
            .is_empty());
        assert_eq!(ctx.timers.live_timers(&reminder.id), 0);
    }

    #[actix_web::main]
    #[test]
    async fn reuses_pending_log_and_skips_resolved_one() {
        let TestContext {
            ctx,
            notifier,
            reminder,
        } = setup(false).await;
        let log = ReminderLog::new(&reminder, 5000);
        ctx.repos.reminder_logs.insert(&log).await.unwrap();

        let fired = usecase(&reminder, Some(log.id.clone()))
            .execute(&ctx)
            .await
            .unwrap()
            .expect("To fire");
        assert_eq!(fired.log.id, log.id);
        assert_eq!(fired.log.scheduled_for, 5000);

        ctx.repos
            .reminder_logs
            .resolve_if_pending(&log.id, LogStatus::Taken, 6000)
            .await
            .unwrap();
        let res = usecase(&reminder, Some(log.id.clone()))
            .execute(&ctx)
            .await
            .unwrap();
        assert!(res.is_none());
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(
            ctx.repos.reminder_logs.find_by_reminder(&reminder.id).await.len(),
            1
        );
    }

    #[actix_web::main]
    #[test]
    async fn notifier_failure_keeps_the_log() {
        let TestContext {
            ctx,
            notifier,
            reminder,
        } = setup(false).await;
        notifier.set_failing(true);

        let fired = usecase(&reminder, None)
            .execute(&ctx)
            .await
            .unwrap()
            .expect("To fire");
        assert!(!fired.notified);
        let stored = ctx.repos.reminder_logs.find(&fired.log.id).await;
        assert_eq!(stored.map(|log| log.status), Some(LogStatus::Pending));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_reminder_is_not_found() {
        let ctx = MedContext::create_inmemory();
        let res = FireReminderUseCase {
            reminder_id: ID::new(),
            log_id: None,
            fire_at: None,
        }
        .execute(&ctx)
        .await;
        assert!(matches!(res, Err(UseCaseErrors::NotFound(_))));
    }
}
