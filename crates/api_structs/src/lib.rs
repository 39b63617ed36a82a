mod adherence;
mod item;
mod reminder;
mod reminder_log;
mod status;
mod user;

pub mod dtos {
    pub use crate::adherence::dtos::*;
    pub use crate::item::dtos::*;
    pub use crate::reminder::dtos::*;
    pub use crate::reminder_log::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::adherence::api::*;
pub use crate::item::api::*;
pub use crate::reminder::api::*;
pub use crate::reminder_log::api::*;
pub use crate::status::api::*;
pub use crate::user::api::*;
