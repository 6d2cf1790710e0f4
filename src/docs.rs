use crate::api::leave_request::CreateLeave;
use crate::api::manager::DecideLeave;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Desk API",
        version = "1.0.0",
        description = r#"
## Leave Desk

Employees request time off, managers approve or reject it, and both see
balances and a shared calendar.

### Key Features
- **Leave requests**: submit, list and filter your own history
- **Balances**: used, pending and available days per leave type
- **Approvals**: approve/reject with a mandatory comment
- **Calendars**: personal view of every request, team view of approved leave

### Security
Every endpoint expects a **JWT Bearer** access token issued by the identity provider.
Employees act on their own data; managers and admins review the team.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::leave_calendar,

        crate::api::manager::list_requests,
        crate::api::manager::pending_count,
        crate::api::manager::decide_request,
        crate::api::manager::list_employees,
        crate::api::manager::team_calendar,
        crate::api::manager::dashboard,

        crate::api::session::permissions
    ),
    components(
        schemas(
            CreateLeave,
            DecideLeave
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Leave", description = "Employee leave APIs"),
        (name = "Manager", description = "Approval and team APIs"),
        (name = "Session", description = "Role permissions"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
