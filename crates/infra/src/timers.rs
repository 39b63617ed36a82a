use actix_web::rt::task::JoinHandle;
use medremind_domain::ID;
use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Mutex, MutexGuard},
};

/// Identifies a live timer. Recurring timers and trigger one-shots are owned
/// by their reminder, fires and nags by the log they target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// The recurring timer driving a reminder schedule
    Reminder(ID),
    /// A one shot fire targeting an existing log, e.g. after a snooze
    Fire { reminder_id: ID, log_id: ID },
    /// A one shot nag for a log that is still pending
    Nag { reminder_id: ID, log_id: ID },
    /// A one shot fire caused by an external event or arrival
    Trigger { reminder_id: ID, trigger_id: ID },
}

impl TimerKey {
    pub fn reminder_id(&self) -> &ID {
        match self {
            Self::Reminder(reminder_id) => reminder_id,
            Self::Fire { reminder_id, .. } => reminder_id,
            Self::Nag { reminder_id, .. } => reminder_id,
            Self::Trigger { reminder_id, .. } => reminder_id,
        }
    }

    /// The reminder or log this timer is grouped under
    pub fn owner(&self) -> &ID {
        match self {
            Self::Reminder(reminder_id) => reminder_id,
            Self::Fire { log_id, .. } => log_id,
            Self::Nag { log_id, .. } => log_id,
            Self::Trigger { reminder_id, .. } => reminder_id,
        }
    }
}

impl Display for TimerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reminder(reminder_id) => write!(f, "reminder::{}", reminder_id),
            Self::Fire {
                reminder_id,
                log_id,
            } => write!(f, "reminder::{}::fire::{}", reminder_id, log_id),
            Self::Nag {
                reminder_id,
                log_id,
            } => write!(f, "reminder::{}::nag::{}", reminder_id, log_id),
            Self::Trigger {
                reminder_id,
                trigger_id,
            } => write!(f, "reminder::{}::trigger::{}", reminder_id, trigger_id),
        }
    }
}

type Timers = HashMap<ID, HashMap<TimerKey, JoinHandle<()>>>;

/// Owns the handles of every live timer grouped by their owner.
#[derive(Default)]
pub struct TimerRegistry {
    timers: Mutex<Timers>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    fn lock(&self) -> MutexGuard<'_, Timers> {
        self.timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores `handle` under `key`, aborting whatever timer had that key
    pub fn replace(&self, key: TimerKey, handle: JoinHandle<()>) {
        let mut timers = self.lock();
        let owned = timers.entry(key.owner().clone()).or_default();
        owned.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = owned.insert(key, handle) {
            previous.abort();
        }
    }

    /// Aborts the recurring timer of the reminder and then lets `arm` start
    /// the new one while the lock is still held, so that the old and new
    /// timers are never live at the same time. One-shots are left alone.
    pub fn rearm<F>(&self, reminder_id: &ID, arm: F)
    where
        F: FnOnce() -> Option<JoinHandle<()>>,
    {
        let key = TimerKey::Reminder(reminder_id.clone());
        let mut timers = self.lock();
        let owned = timers.entry(reminder_id.clone()).or_default();
        if let Some(previous) = owned.remove(&key) {
            previous.abort();
        }
        if let Some(handle) = arm() {
            owned.insert(key, handle);
        }
        if owned.is_empty() {
            timers.remove(reminder_id);
        }
    }

    /// Aborts a single timer. Returns false if there was no such timer.
    pub fn cancel(&self, key: &TimerKey) -> bool {
        let mut timers = self.lock();
        match timers
            .get_mut(key.owner())
            .and_then(|owned| owned.remove(key))
        {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every timer of the reminder, including the ones owned by its
    /// logs, and returns how many were aborted
    pub fn cancel_reminder(&self, reminder_id: &ID) -> usize {
        let mut timers = self.lock();
        let mut cancelled = 0;
        for owned in timers.values_mut() {
            owned.retain(|key, handle| {
                if key.reminder_id() != reminder_id {
                    return true;
                }
                handle.abort();
                cancelled += 1;
                false
            });
        }
        timers.retain(|_, owned| !owned.is_empty());
        cancelled
    }

    /// Number of timers owned by the reminder or log that have not run to
    /// completion
    pub fn live_timers(&self, owner: &ID) -> usize {
        self.live_keys(owner).len()
    }

    pub fn live_keys(&self, owner: &ID) -> Vec<TimerKey> {
        self.lock()
            .get(owner)
            .map(|owned| {
                owned
                    .iter()
                    .filter(|(_, handle)| !handle.is_finished())
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
