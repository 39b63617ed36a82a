use super::{
    create_reminder::CreateReminderUseCase, set_reminder_active::SetReminderActiveUseCase,
    update_reminder_schedule::UpdateReminderScheduleUseCase,
};
use crate::{scheduler::Scheduler, shared::usecase::Subscriber};
use medremind_domain::Reminder;
use medremind_infra::MedContext;

pub struct ScheduleOnReminderCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateReminderUseCase> for ScheduleOnReminderCreated {
    async fn notify(&self, reminder: &Reminder, ctx: &MedContext) {
        Scheduler::new(ctx).schedule(reminder);
    }
}

pub struct RescheduleOnReminderUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateReminderScheduleUseCase> for RescheduleOnReminderUpdated {
    async fn notify(&self, reminder: &Reminder, ctx: &MedContext) {
        Scheduler::new(ctx).schedule(reminder);
    }
}

/// Pausing cancels every timer and resuming arms them again
pub struct RescheduleOnActiveChanged;

#[async_trait::async_trait(?Send)]
impl Subscriber<SetReminderActiveUseCase> for RescheduleOnActiveChanged {
    async fn notify(&self, reminder: &Reminder, ctx: &MedContext) {
        Scheduler::new(ctx).schedule(reminder);
    }
}
