use crate::{
    error::MedError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::set_user_timezone::*;
use medremind_domain::{
    timezone::{resolve_timezone, timezone_from_coordinates, valid_coordinates},
    User, ValidationError, ID,
};
use medremind_infra::MedContext;

pub async fn set_user_timezone_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let body = body.into_inner();
    let location = match (body.timezone, body.lat, body.lon) {
        (Some(text), _, _) => UserLocation::Text(text),
        (None, Some(lat), Some(lon)) => UserLocation::Coordinates { lat, lon },
        _ => {
            return Err(MedError::BadClientData(
                "Either a timezone or both lat and lon have to be given".into(),
            ))
        }
    };
    let usecase = SetUserTimezoneUseCase {
        user_id: path.into_inner().user_id,
        location,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(MedError::from)
}

#[derive(Debug, Clone)]
pub enum UserLocation {
    /// A zone id or a city name
    Text(String),
    Coordinates { lat: f64, lon: f64 },
}

/// Resolves where the user lives into a timezone. Existing reminders keep the
/// timezone they were created with.
#[derive(Debug)]
pub struct SetUserTimezoneUseCase {
    pub user_id: ID,
    pub location: UserLocation,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    /// The caller should ask the user again
    Unresolved(ValidationError),
    NotFound(ID),
    StorageError,
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::Unresolved(e) => Self::BadClientData(e.to_string()),
            UseCaseErrors::NotFound(id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", id))
            }
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetUserTimezoneUseCase {
    type Response = User;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let timezone = match &self.location {
            UserLocation::Text(text) => resolve_timezone(text).ok_or_else(|| {
                UseCaseErrors::Unresolved(ValidationError::UnknownTimezone(text.clone()))
            })?,
            UserLocation::Coordinates { lat, lon } => {
                if !valid_coordinates(*lat, *lon) {
                    return Err(UseCaseErrors::Unresolved(
                        ValidationError::InvalidCoordinates(*lat, *lon),
                    ));
                }
                timezone_from_coordinates(*lat, *lon).ok_or_else(|| {
                    UseCaseErrors::Unresolved(ValidationError::UnknownTimezone(format!(
                        "{}, {}",
                        lat, lon
                    )))
                })?
            }
        };

        let mut user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.user_id.clone()))?;
        user.timezone = timezone;
        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(user)
    }
}
