use crate::{
    reminder_log::{LogStatus, ReminderLog},
    shared::entity::ID,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceCounts {
    pub taken: u32,
    pub missed: u32,
    pub snoozed: u32,
    pub pending: u32,
}

impl AdherenceCounts {
    fn add(&mut self, status: LogStatus) {
        match status {
            LogStatus::Taken => self.taken += 1,
            LogStatus::Missed => self.missed += 1,
            LogStatus::Snoozed => self.snoozed += 1,
            LogStatus::Pending => self.pending += 1,
        }
    }

    /// Taken out of resolved (taken or missed) firings, in percent with one
    /// decimal. Zero when nothing got resolved.
    pub fn adherence_percent(&self) -> f64 {
        let resolved = (self.taken + self.missed).max(1);
        let percent = f64::from(self.taken) / f64::from(resolved) * 100.0;
        (percent * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemAdherence {
    /// `None` groups the general reminders
    pub item_id: Option<ID>,
    pub counts: AdherenceCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdherenceSummary {
    pub counts: AdherenceCounts,
    pub per_item: Vec<ItemAdherence>,
}

impl AdherenceSummary {
    /// Aggregates `logs`. `item_of` maps a reminder id to the item it is about.
    pub fn from_logs<F>(logs: &[ReminderLog], item_of: F) -> Self
    where
        F: Fn(&ID) -> Option<ID>,
    {
        let mut counts = AdherenceCounts::default();
        let mut per_item: HashMap<Option<ID>, AdherenceCounts> = HashMap::new();
        for log in logs {
            counts.add(log.status);
            per_item
                .entry(item_of(&log.reminder_id))
                .or_default()
                .add(log.status);
        }

        let mut per_item = per_item
            .into_iter()
            .map(|(item_id, counts)| ItemAdherence { item_id, counts })
            .collect::<Vec<_>>();
        // General reminders last, the rest in a stable order
        per_item.sort_by(|a, b| match (&a.item_id, &b.item_id) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Self { counts, per_item }
    }

    pub fn adherence_percent(&self) -> f64 {
        self.counts.adherence_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(reminder_id: &ID, status: LogStatus) -> ReminderLog {
        ReminderLog {
            id: Default::default(),
            reminder_id: reminder_id.clone(),
            user_id: Default::default(),
            scheduled_for: 0,
            status,
            taken_at: None,
            resolved_at: None,
            note: None,
        }
    }

    #[test]
    fn adherence_is_taken_over_resolved() {
        let counts = AdherenceCounts {
            taken: 2,
            missed: 1,
            snoozed: 5,
            pending: 1,
        };
        assert_eq!(counts.adherence_percent(), 66.7);
        assert_eq!(AdherenceCounts::default().adherence_percent(), 0.0);
    }

    #[test]
    fn it_breaks_down_per_item() {
        let item = ID::new();
        let with_item = ID::new();
        let general = ID::new();
        let logs = vec![
            log(&with_item, LogStatus::Taken),
            log(&with_item, LogStatus::Taken),
            log(&with_item, LogStatus::Missed),
            log(&general, LogStatus::Snoozed),
            log(&general, LogStatus::Taken),
        ];

        let summary = AdherenceSummary::from_logs(&logs, |reminder_id| {
            if reminder_id == &with_item {
                Some(item.clone())
            } else {
                None
            }
        });
        assert_eq!(summary.counts.taken, 3);
        assert_eq!(summary.counts.snoozed, 1);
        assert_eq!(summary.adherence_percent(), 75.0);
        assert_eq!(summary.per_item.len(), 2);
        assert_eq!(summary.per_item[0].item_id, Some(item));
        assert_eq!(summary.per_item[0].counts.missed, 1);
        assert_eq!(summary.per_item[1].item_id, None);
        assert_eq!(summary.per_item[1].counts.adherence_percent(), 100.0);
    }
}
