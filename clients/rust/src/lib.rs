mod base;
mod item;
mod log;
mod reminder;
mod status;
mod user;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use item::ItemClient;
use log::ReminderLogClient;
pub use medremind_api_structs::dtos::*;
pub use medremind_domain::{LogStatus, ReminderSchedule, ID};
use reminder::ReminderClient;
use status::StatusClient;
use std::sync::Arc;
pub use user::SetTimezoneInput;
use user::UserClient;

/// Medremind Server SDK
///
/// `address` is the base url of the api, e.g. `http://localhost:5000/api/v1`
#[derive(Clone)]
pub struct MedremindSDK {
    pub item: ItemClient,
    pub log: ReminderLogClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub user: UserClient,
}

impl MedremindSDK {
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        Self {
            item: ItemClient::new(base.clone()),
            log: ReminderLogClient::new(base.clone()),
            reminder: ReminderClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            user: UserClient::new(base),
        }
    }
}
