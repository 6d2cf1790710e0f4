use actix_web::{HttpResponse, Responder, web};

use crate::auth::AuthUser;
use crate::service::LeaveService;

/// Actions, navigation links and landing page for the caller's role.
#[utoipa::path(
    get,
    path = "/api/session/permissions",
    responses(
        (status = 200, description = "Permission set for the caller's role", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Session"
)]
pub async fn permissions(auth: AuthUser, service: web::Data<LeaveService>) -> impl Responder {
    HttpResponse::Ok().json(service.permissions(&auth.actor()))
}
