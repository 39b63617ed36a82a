use crate::shared::entity::{Entity, ID};
use chrono_tz::{Tz, UTC};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub timezone: Tz,
}

impl User {
    pub fn new(name: String) -> Self {
        Self {
            id: Default::default(),
            name,
            timezone: UTC,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
