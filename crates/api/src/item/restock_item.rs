use crate::{
    error::MedError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::restock_item::*;
use medremind_domain::{Item, ValidationError, ID};
use medremind_infra::MedContext;

pub async fn restock_item_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = RestockItemUseCase {
        item_id: path.into_inner().item_id,
        quantity: body.into_inner().quantity,
    };

    execute(usecase, &ctx)
        .await
        .map(|item| HttpResponse::Ok().json(APIResponse::new(item)))
        .map_err(MedError::from)
}

/// Adds stock to an item. The next low stock sweep notices the recovery.
#[derive(Debug)]
pub struct RestockItemUseCase {
    pub item_id: ID,
    pub quantity: f64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidQuantity(ValidationError),
    NotFound(ID),
    StorageError,
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidQuantity(e) => Self::BadClientData(e.to_string()),
            UseCaseErrors::NotFound(id) => {
                Self::NotFound(format!("The item with id: {}, was not found.", id))
            }
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RestockItemUseCase {
    type Response = Item;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        // Also rejects NaN
        if !(self.quantity > 0.0) {
            return Err(UseCaseErrors::InvalidQuantity(
                ValidationError::NonPositiveQuantity(self.quantity),
            ));
        }

        ctx.repos
            .items
            .restock(&self.item_id, self.quantity)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::NotFound(self.item_id.clone()))
    }
}
