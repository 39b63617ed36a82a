use crate::dtos::UserDTO;
use medremind_domain::{User, ID};
use serde::{Deserialize, Serialize};

pub mod set_user_timezone {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    /// Either a free text timezone or city, or the coordinates of the user
    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub timezone: Option<String>,
        #[serde(default)]
        pub lat: Option<f64>,
        #[serde(default)]
        pub lon: Option<f64>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub user: UserDTO,
    }

    impl APIResponse {
        pub fn new(user: User) -> Self {
            Self {
                user: UserDTO::new(user),
            }
        }
    }
}
