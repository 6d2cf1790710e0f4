use crate::api::{leave_request, manager, session};
use crate::error::LeaveError;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware};
use actix_web::web;

/// Per peer IP limiter for the protected API.
pub fn rate_limit(
    requests_per_min: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit of {requests_per_min} requests/min"))
}

/// Malformed bodies, ids and query strings answer with the same JSON error
/// shape as the core's validation failures.
fn extractor_errors(scope: actix_web::Scope) -> actix_web::Scope {
    scope
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            LeaveError::validation("body", err.to_string()).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            LeaveError::validation("leave_id", err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            LeaveError::validation("query", err.to_string()).into()
        }))
}

/// Registers every bearer-protected endpoint under `api_prefix`.
pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.service(
        extractor_errors(web::scope(api_prefix))
            .service(
                web::scope("/leaves")
                    // /leaves/request
                    .service(
                        web::resource("/request").route(web::post().to(leave_request::create_leave)),
                    )
                    // /leaves/requests
                    .service(
                        web::resource("/requests").route(web::get().to(leave_request::my_leaves)),
                    )
                    .service(
                        web::resource("/balance").route(web::get().to(leave_request::leave_balance)),
                    )
                    .service(
                        web::resource("/calendar").route(web::get().to(leave_request::leave_calendar)),
                    ),
            )
            .service(
                web::scope("/manager")
                    // /manager/requests
                    .service(
                        web::resource("/requests").route(web::get().to(manager::list_requests)),
                    )
                    // before {leave_id} so the literal segment wins
                    .service(
                        web::resource("/requests/pending-count")
                            .route(web::get().to(manager::pending_count)),
                    )
                    // /manager/requests/{leave_id}
                    .service(
                        web::resource("/requests/{leave_id}")
                            .route(web::put().to(manager::decide_request)),
                    )
                    .service(
                        web::resource("/employees").route(web::get().to(manager::list_employees)),
                    )
                    .service(
                        web::resource("/leave-calendar").route(web::get().to(manager::team_calendar)),
                    )
                    .service(
                        web::resource("/dashboard").route(web::get().to(manager::dashboard)),
                    ),
            )
            .service(
                web::scope("/session")
                    .service(
                        web::resource("/permissions").route(web::get().to(session::permissions)),
                    ),
            ),
    );
}

// REQUEST
//  └─ Authorization: Bearer <access token from the identity provider>
//       └─ AuthUser { id, role } ─→ LeaveService ─→ access policy ─→ core
