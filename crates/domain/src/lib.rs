mod adherence;
mod item;
mod reminder;
mod reminder_log;
mod shared;
mod timespan;
pub mod timezone;
mod user;
mod validation;

pub use adherence::{AdherenceCounts, AdherenceSummary, ItemAdherence};
pub use item::Item;
pub use reminder::{
    parse_days_of_week, parse_time_of_day, NagPolicy, Reminder, ReminderSchedule, ScheduleKind,
    TimerPlan,
};
pub use reminder_log::{LogStatus, ReminderLog};
pub use shared::entity::{Entity, ID};
pub use timespan::TimeSpan;
pub use user::User;
pub use validation::ValidationError;
