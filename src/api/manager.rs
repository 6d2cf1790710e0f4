use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::LeaveError;
use crate::model::leave_request::DecisionAction;
use crate::service::LeaveService;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeave {
    /// "approve" or "reject"
    #[schema(example = "approve")]
    pub action: String,
    #[schema(example = "Enjoy the break")]
    #[serde(default)]
    pub manager_comment: String,
}

#[utoipa::path(
    get,
    path = "/api/manager/requests",
    responses(
        (status = 200, description = "Every leave request with its employee", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn list_requests(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let requests = service.team_requests(&auth.actor())?;
    Ok(HttpResponse::Ok().json(requests))
}

#[utoipa::path(
    get,
    path = "/api/manager/requests/pending-count",
    responses(
        (status = 200, description = "Requests still waiting for a decision", body = Object, example = json!({"pending": 3})),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn pending_count(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let pending = service.pending_count(&auth.actor())?;
    Ok(HttpResponse::Ok().json(json!({ "pending": pending })))
}

/* =========================
Approve / reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/manager/requests/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to decide")
    ),
    request_body(
        content = DecideLeave,
        description = "Decision and mandatory comment",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave decided", body = Object, example = json!({
            "message": "Leave approved",
            "leave": {"status": "approved", "managerComment": "Enjoy the break"}
        })),
        (status = 400, description = "Unknown action or empty comment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an approver, or own request"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn decide_request(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, LeaveError> {
    let leave_id = path.into_inner();
    let action = DecisionAction::parse(&payload.action)?;

    let leave = service.decide(&auth.actor(), leave_id, action, &payload.manager_comment)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave {}", leave.status),
        "leave": leave,
    })))
}

#[utoipa::path(
    get,
    path = "/api/manager/employees",
    responses(
        (status = 200, description = "Employees that can hold leave", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn list_employees(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let employees = service.employees(&auth.actor())?;
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    get,
    path = "/api/manager/leave-calendar",
    responses(
        (status = 200, description = "Approved leave across the team", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn team_calendar(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let events = service.team_calendar(&auth.actor())?;
    Ok(HttpResponse::Ok().json(events))
}

#[utoipa::path(
    get,
    path = "/api/manager/dashboard",
    responses(
        (status = 200, description = "Status counts, head-count and recent requests", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn dashboard(
    auth: AuthUser,
    service: web::Data<LeaveService>,
) -> Result<HttpResponse, LeaveError> {
    let dashboard = service.manager_dashboard(&auth.actor())?;
    Ok(HttpResponse::Ok().json(dashboard))
}
