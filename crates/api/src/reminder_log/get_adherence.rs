use crate::{
    error::MedError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::{dtos::ItemAdherenceDTO, get_adherence::*};
use medremind_domain::{AdherenceSummary, TimeSpan, ID};
use medremind_infra::MedContext;
use std::collections::HashMap;

const DEFAULT_WINDOW_DAYS: u32 = 30;

pub async fn get_adherence_controller(
    path: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = GetAdherenceUseCase {
        user_id: path.into_inner().user_id,
        days: query.days.unwrap_or(DEFAULT_WINDOW_DAYS),
    };

    execute(usecase, &ctx)
        .await
        .map(|report| {
            let item_names = report.item_names;
            let items = report
                .summary
                .per_item
                .into_iter()
                .map(|item| ItemAdherenceDTO {
                    item_name: item
                        .item_id
                        .as_ref()
                        .and_then(|id| item_names.get(id).cloned()),
                    item_id: item.item_id,
                    adherence_percent: item.counts.adherence_percent(),
                    counts: item.counts,
                })
                .collect();
            HttpResponse::Ok().json(APIResponse {
                days: report.days,
                adherence_percent: report.summary.counts.adherence_percent(),
                counts: report.summary.counts,
                items,
            })
        })
        .map_err(MedError::from)
}

/// Adherence of a user over the last `days` days
#[derive(Debug)]
pub struct GetAdherenceUseCase {
    pub user_id: ID,
    pub days: u32,
}

#[derive(Debug)]
pub struct AdherenceReport {
    pub days: u32,
    pub summary: AdherenceSummary,
    pub item_names: HashMap<ID, String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidDays,
    UserNotFound(ID),
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidDays => {
                Self::BadClientData("The window has to be at least one day".into())
            }
            UseCaseErrors::UserNotFound(id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAdherenceUseCase {
    type Response = AdherenceReport;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        if self.days < 1 {
            return Err(UseCaseErrors::InvalidDays);
        }
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseErrors::UserNotFound(self.user_id.clone()));
        }

        let timespan = TimeSpan::last_days(ctx.sys.get_timestamp_millis(), self.days);
        let logs = ctx
            .repos
            .reminder_logs
            .find_by_user(&self.user_id, &timespan)
            .await;
        let reminder_items = ctx
            .repos
            .reminders
            .find_by_user(&self.user_id)
            .await
            .into_iter()
            .map(|reminder| (reminder.id, reminder.item_id))
            .collect::<HashMap<_, _>>();
        let item_names = ctx
            .repos
            .items
            .find_by_user(&self.user_id)
            .await
            .into_iter()
            .map(|item| (item.id, item.name))
            .collect();

        let summary = AdherenceSummary::from_logs(&logs, |reminder_id| {
            reminder_items.get(reminder_id).cloned().flatten()
        });

        Ok(AdherenceReport {
            days: self.days,
            summary,
            item_names,
        })
    }
}
