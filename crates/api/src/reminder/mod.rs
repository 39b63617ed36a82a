pub mod create_reminder;
pub mod fire_reminder;
pub mod rearm_reminders;
pub mod send_nag;
pub mod set_reminder_active;
mod subscribers;
pub mod sync_reminder;
pub mod trigger_arrival;
pub mod trigger_event;
pub mod update_reminder_schedule;

use actix_web::web;
use medremind_api_structs::dtos::ArmedTriggerDTO;
use medremind_domain::ID;

/// A one shot fire armed by an event or arrival
#[derive(Debug, Clone, PartialEq)]
pub struct ArmedTrigger {
    pub reminder_id: ID,
    pub fire_at: i64,
}

impl From<ArmedTrigger> for ArmedTriggerDTO {
    fn from(trigger: ArmedTrigger) -> Self {
        Self {
            reminder_id: trigger.reminder_id,
            fire_at: trigger.fire_at,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/{reminder_id}/sync",
        web::post().to(sync_reminder::sync_reminder_controller),
    );
    cfg.route(
        "/users/{user_id}/events",
        web::post().to(trigger_event::trigger_event_controller),
    );
    cfg.route(
        "/users/{user_id}/arrivals",
        web::post().to(trigger_arrival::trigger_arrival_controller),
    );
}
