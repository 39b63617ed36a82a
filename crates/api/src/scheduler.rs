use crate::{
    reminder::{fire_reminder::FireReminderUseCase, send_nag::SendNagUseCase},
    shared::usecase::execute,
};
use actix_web::rt::{
    spawn,
    task::JoinHandle,
    time::{interval, sleep},
};
use chrono::{DateTime, Duration, Utc};
use medremind_domain::{Reminder, TimerPlan, ID};
use medremind_infra::{MedContext, TimerKey};
use tracing::{debug, warn};

/// Arms and cancels the timers of reminders. Every timer handle is kept in
/// the `TimerRegistry` of the context, keyed by the reminder it belongs to.
pub struct Scheduler {
    ctx: MedContext,
}

fn to_std(duration: Duration) -> std::time::Duration {
    duration.to_std().unwrap_or_default()
}

/// Runs the firing pipeline as its own task so that cancelling the timer that
/// started it does not interrupt a firing in progress
fn fire_detached(ctx: MedContext, reminder_id: ID, log_id: Option<ID>, fire_at: Option<i64>) {
    spawn(async move {
        let usecase = FireReminderUseCase {
            reminder_id,
            log_id,
            fire_at,
        };
        let _ = execute(usecase, &ctx).await;
    });
}

impl Scheduler {
    pub fn new(ctx: &MedContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Replaces the recurring timer of the reminder with the one its schedule
    /// needs. One-shots armed for its logs keep running. An inactive reminder
    /// ends up without any timers. Returns the number of live timers owned by
    /// the reminder afterwards.
    pub fn schedule(&self, reminder: &Reminder) -> usize {
        if !reminder.active {
            let cancelled = self.cancel(&reminder.id);
            debug!("Reminder: {} is inactive, cancelled {} timers", reminder.id, cancelled);
            return 0;
        }
        if reminder.schedule.falls_back_to_daily() {
            warn!(
                "Weekly reminder: {} has no days of week and will fire every day",
                reminder.id
            );
        }

        self.ctx
            .timers
            .rearm(&reminder.id, || match reminder.schedule.timer_plan() {
                TimerPlan::WallClock => Some(self.spawn_wall_clock(reminder.clone())),
                TimerPlan::Every(period) => Some(self.spawn_every(reminder.id.clone(), period)),
                TimerPlan::External => None,
            });

        let live = self.ctx.timers.live_timers(&reminder.id);
        debug!("Reminder: {} scheduled with {} live timers", reminder.id, live);
        live
    }

    /// Stops every not yet fired timer of the reminder and of its logs
    pub fn cancel(&self, reminder_id: &ID) -> usize {
        self.ctx.timers.cancel_reminder(reminder_id)
    }

    pub fn cancel_nag(&self, reminder_id: &ID, log_id: &ID) -> bool {
        self.ctx.timers.cancel(&TimerKey::Nag {
            reminder_id: reminder_id.clone(),
            log_id: log_id.clone(),
        })
    }

    /// One shot fire after `delay` that reuses the pending log `log_id`
    pub fn arm_fire(&self, reminder_id: &ID, log_id: &ID, delay: Duration) -> TimerKey {
        let key = TimerKey::Fire {
            reminder_id: reminder_id.clone(),
            log_id: log_id.clone(),
        };
        let ctx = self.ctx.clone();
        let reminder_id = reminder_id.clone();
        let log_id = log_id.clone();
        let handle = spawn(async move {
            sleep(to_std(delay)).await;
            fire_detached(ctx, reminder_id, Some(log_id), None);
        });
        self.ctx.timers.replace(key.clone(), handle);
        key
    }

    /// One shot fire after `delay` that creates a new log, used by the event
    /// and arrival triggers
    pub fn arm_trigger(&self, reminder_id: &ID, delay: Duration) -> TimerKey {
        let key = TimerKey::Trigger {
            reminder_id: reminder_id.clone(),
            trigger_id: ID::new(),
        };
        let ctx = self.ctx.clone();
        let reminder_id = reminder_id.clone();
        let handle = spawn(async move {
            sleep(to_std(delay)).await;
            fire_detached(ctx, reminder_id, None, None);
        });
        self.ctx.timers.replace(key.clone(), handle);
        key
    }

    /// Single follow up for `log_id` after the nag interval of the reminder
    pub fn arm_nag(&self, reminder: &Reminder, log_id: &ID) -> TimerKey {
        let key = TimerKey::Nag {
            reminder_id: reminder.id.clone(),
            log_id: log_id.clone(),
        };
        let ctx = self.ctx.clone();
        let log_id = log_id.clone();
        let delay = Duration::minutes(i64::from(reminder.nag.interval_minutes));
        let handle = spawn(async move {
            sleep(to_std(delay)).await;
            spawn(async move {
                let _ = execute(SendNagUseCase { log_id }, &ctx).await;
            });
        });
        self.ctx.timers.replace(key.clone(), handle);
        key
    }

    fn spawn_wall_clock(&self, reminder: Reminder) -> JoinHandle<()> {
        let ctx = self.ctx.clone();
        spawn(async move {
            let mut last_fired: Option<DateTime<Utc>> = None;
            loop {
                let now = ctx.sys.now();
                // The wall clock may lag behind the timer that just woke us up
                let after = last_fired.map_or(now, |last| std::cmp::max(now, last));
                let next = match reminder.schedule.next_fire_after(&reminder.timezone, after) {
                    Some(next) => next,
                    None => {
                        warn!("Reminder: {} has no upcoming fire time", reminder.id);
                        return;
                    }
                };
                sleep(to_std(next - now)).await;
                last_fired = Some(next);
                fire_detached(
                    ctx.clone(),
                    reminder.id.clone(),
                    None,
                    Some(next.timestamp_millis()),
                );
            }
        })
    }

    fn spawn_every(&self, reminder_id: ID, period: Duration) -> JoinHandle<()> {
        let ctx = self.ctx.clone();
        let period = to_std(period).max(std::time::Duration::from_secs(60));
        spawn(async move {
            // The first tick completes right away
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                fire_detached(ctx.clone(), reminder_id.clone(), None, None);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use medremind_domain::{NagPolicy, ReminderSchedule};
    use medremind_infra::InMemoryNotifier;
    use std::sync::Arc;

    fn reminder(schedule: ReminderSchedule) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: Default::default(),
            item_id: None,
            label: Some("Stretch".into()),
            schedule,
            timezone: chrono_tz::Europe::Moscow,
            nag: NagPolicy {
                enabled: true,
                interval_minutes: 15,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        }
    }

    fn fixed_time() -> ReminderSchedule {
        ReminderSchedule::FixedTime {
            time_of_day: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn schedule_then_cancel_leaves_no_timers() {
        let ctx = MedContext::create_inmemory();
        let scheduler = Scheduler::new(&ctx);
        let reminder = reminder(fixed_time());

        assert_eq!(scheduler.schedule(&reminder), 1);
        scheduler.cancel(&reminder.id);
        assert_eq!(ctx.timers.live_timers(&reminder.id), 0);
    }

    #[actix_web::main]
    #[test]
    async fn scheduling_twice_keeps_a_single_timer() {
        let ctx = MedContext::create_inmemory();
        let scheduler = Scheduler::new(&ctx);
        for schedule in vec![
            fixed_time(),
            ReminderSchedule::Weekly {
                time_of_day: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
                days_of_week: vec![chrono::Weekday::Sun],
            },
        ] {
            let reminder = reminder(schedule);
            scheduler.schedule(&reminder);
            scheduler.schedule(&reminder);
            assert_eq!(ctx.timers.live_timers(&reminder.id), 1);
            assert_eq!(
                ctx.timers.live_keys(&reminder.id),
                vec![TimerKey::Reminder(reminder.id.clone())]
            );
        }
    }

    #[actix_web::main]
    #[test]
    async fn rescheduling_keeps_one_shots_of_logs() {
        let ctx = MedContext::create_inmemory();
        let scheduler = Scheduler::new(&ctx);
        let reminder = reminder(fixed_time());
        let snoozed_log_id = ID::new();
        let nagged_log_id = ID::new();

        scheduler.schedule(&reminder);
        let fire = scheduler.arm_fire(&reminder.id, &snoozed_log_id, Duration::minutes(10));
        let nag = scheduler.arm_nag(&reminder, &nagged_log_id);
        scheduler.arm_trigger(&reminder.id, Duration::hours(1));
        assert_eq!(ctx.timers.live_timers(&reminder.id), 2);

        assert_eq!(scheduler.schedule(&reminder), 2);
        assert_eq!(
            ctx.timers
                .live_keys(&reminder.id)
                .into_iter()
                .filter(|key| matches!(key, TimerKey::Reminder(_)))
                .count(),
            1
        );
        assert_eq!(ctx.timers.live_keys(&snoozed_log_id), vec![fire]);
        assert_eq!(ctx.timers.live_keys(&nagged_log_id), vec![nag]);

        scheduler.cancel(&reminder.id);
        assert_eq!(ctx.timers.live_timers(&reminder.id), 0);
        assert_eq!(ctx.timers.live_timers(&snoozed_log_id), 0);
        assert_eq!(ctx.timers.live_timers(&nagged_log_id), 0);
    }

    #[actix_web::main]
    #[test]
    async fn inactive_and_external_reminders_own_no_timers() {
        let ctx = MedContext::create_inmemory();
        let scheduler = Scheduler::new(&ctx);

        let mut paused = reminder(fixed_time());
        let log_id = ID::new();
        scheduler.schedule(&paused);
        scheduler.arm_fire(&paused.id, &log_id, Duration::minutes(30));
        paused.active = false;
        assert_eq!(scheduler.schedule(&paused), 0);
        assert_eq!(ctx.timers.live_timers(&log_id), 0);

        let event = reminder(ReminderSchedule::EventOffset {
            event_label: "lunch".into(),
            offset_minutes: 30,
        });
        assert_eq!(scheduler.schedule(&event), 0);

        let geo = reminder(ReminderSchedule::GeoTrigger {
            lat: 56.48,
            lon: 84.95,
        });
        assert_eq!(scheduler.schedule(&geo), 0);
    }

    #[actix_web::main]
    #[test]
    async fn interval_reminders_fire_right_away() {
        let mut ctx = MedContext::create_inmemory();
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.services.notifier = notifier.clone();

        let mut reminder = reminder(ReminderSchedule::Interval { interval_hours: 4 });
        reminder.nag.enabled = false;
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let scheduler = Scheduler::new(&ctx);
        assert_eq!(scheduler.schedule(&reminder), 1);
        sleep(std::time::Duration::from_millis(100)).await;

        assert_eq!(notifier.sent_to(&reminder.user_id).len(), 1);
        let logs = ctx.repos.reminder_logs.find_by_reminder(&reminder.id).await;
        assert_eq!(logs.len(), 1);
        assert!(logs[0].is_pending());
        assert_eq!(ctx.timers.live_timers(&reminder.id), 1);
    }
}
