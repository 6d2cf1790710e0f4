use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthUser;
use crate::dashboard::HistoryFilter;
use crate::error::LeaveError;
use crate::model::leave_request::{LeaveDraft, LeaveStatus};
use crate::service::LeaveService;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    #[schema(example = "sick")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "Family wedding")]
    pub reason: String,
}

impl From<CreateLeave> for LeaveDraft {
    fn from(payload: CreateLeave) -> Self {
        LeaveDraft {
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Filter by status: pending, approved, rejected or all
    pub status: Option<String>,
    /// Matches the leave type or the start date (d/m/yyyy, e.g. 14/8/2026)
    pub search: Option<String>,
}

impl HistoryQuery {
    fn into_filter(self) -> Result<HistoryFilter, LeaveError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<LeaveStatus>().map_err(|_| {
                LeaveError::validation("status", "must be pending, approved, rejected or all")
            })?),
        };
        Ok(HistoryFilter {
            status,
            search: self.search,
        })
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves/request",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted, status pending", body = Object),
        (status = 400, description = "Invalid leave type, reason or dates"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employees can request leave"),
        (status = 422, description = "Not enough balance left for this leave type")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, LeaveError> {
    let leave = service.submit(&auth.actor(), payload.into_inner().into())?;
    Ok(HttpResponse::Created().json(leave))
}

/// Own requests, newest first, with per-status counts.
#[utoipa::path(
    get,
    path = "/api/leaves/requests",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Leave history", body = Object),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, LeaveError> {
    let filter = query.into_inner().into_filter()?;
    let history = service.history(&auth.actor(), &filter)?;
    Ok(HttpResponse::Ok().json(history))
}

#[utoipa::path(
    get,
    path = "/api/leaves/balance",
    responses(
        (status = 200, description = "Per type and total used, pending and available days", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let snapshot = service.balance(&auth.actor())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[utoipa::path(
    get,
    path = "/api/leaves/calendar",
    responses(
        (status = 200, description = "All own requests as all-day events", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_calendar(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let events = service.personal_calendar(&auth.actor())?;
    Ok(HttpResponse::Ok().json(events))
}
