use crate::{
    item::sweep_low_stock::{NotifiedItems, SweepLowStockUseCase},
    reminder::rearm_reminders::RearmActiveRemindersUseCase,
    shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep};
use medremind_infra::MedContext;
use std::time::Duration;

/// Timers only live in memory so every active reminder is armed again on startup
pub fn start_rearm_reminders_job(ctx: MedContext) {
    actix_web::rt::spawn(async move {
        let _ = execute(RearmActiveRemindersUseCase, &ctx).await;
    });
}

pub fn start_low_stock_watch_job(ctx: MedContext) {
    actix_web::rt::spawn(async move {
        let notified = NotifiedItems::default();
        sleep(Duration::from_secs(ctx.config.low_stock_first_sweep_delay_secs)).await;

        let period = Duration::from_secs(ctx.config.low_stock_sweep_interval_secs.max(1));
        let mut sweep_interval = interval(period);
        loop {
            sweep_interval.tick().await;
            let context = ctx.clone();
            let usecase = SweepLowStockUseCase {
                notified: notified.clone(),
            };
            actix_web::rt::spawn(async move {
                let _ = execute(usecase, &context).await;
            });
        }
    });
}
