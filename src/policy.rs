//! Role based access rules. Everything not listed for a role is denied.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::LeaveError;
use crate::model::role::Role;
use crate::model::user::Actor;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    CreateRequest,
    ReadRequests,
    ReadBalance,
    ReadCalendar,
    ReadAllRequests,
    ReadTeamCalendar,
    ReadEmployees,
    DecideRequest,
}

/// What an action is aimed at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Data belonging to one employee: their requests, balance or calendar.
    Employee(u64),
    /// A single request, identified by its owner.
    Request { owner: u64 },
    /// Organisation wide views, and the approval queue as a whole.
    Team,
}

fn permits(actor: &Actor, action: Action, resource: Resource) -> bool {
    use Action::*;

    match (actor.role, action, resource) {
        (
            Role::Employee,
            CreateRequest | ReadRequests | ReadBalance | ReadCalendar,
            Resource::Employee(owner),
        ) => owner == actor.id,
        (Role::Manager | Role::Admin, ReadAllRequests | ReadTeamCalendar | ReadEmployees, Resource::Team) => true,
        (Role::Manager | Role::Admin, DecideRequest, Resource::Request { owner }) => owner != actor.id,
        // Approver gate, checked before the request is even looked up.
        (Role::Manager | Role::Admin, DecideRequest, Resource::Team) => true,
        _ => false,
    }
}

pub fn authorize(actor: &Actor, action: Action, resource: Resource) -> Result<(), LeaveError> {
    if permits(actor, action, resource) {
        Ok(())
    } else {
        tracing::debug!(actor_id = actor.id, role = %actor.role, %action, ?resource, "access denied");
        Err(LeaveError::Authorization {
            actor_id: actor.id,
            action,
        })
    }
}

/// Client-side pages. Paths match what the presentation layer routes on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    EmployeeDashboard,
    ApplyLeave,
    LeaveCalendar,
    LeaveHistory,
    ManagerDashboard,
    ApproveRequests,
    TeamCalendar,
    AdminDashboard,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::EmployeeDashboard => "/employee/dashboard",
            Page::ApplyLeave => "/employee/apply-leave",
            Page::LeaveCalendar => "/employee/leave-calendar",
            Page::LeaveHistory => "/employee/leave-history",
            Page::ManagerDashboard => "/manager/dashboard",
            Page::ApproveRequests => "/manager/approve-requests",
            Page::TeamCalendar => "/manager/leave-calendar",
            Page::AdminDashboard => "/admin/dashboard",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::EmployeeDashboard | Page::ManagerDashboard | Page::AdminDashboard => "Dashboard",
            Page::ApplyLeave => "Apply Leave",
            Page::LeaveCalendar | Page::TeamCalendar => "Leave Calendar",
            Page::LeaveHistory => "Leave History",
            Page::ApproveRequests => "Approve Requests",
        }
    }

    pub fn role(self) -> Role {
        match self {
            Page::EmployeeDashboard | Page::ApplyLeave | Page::LeaveCalendar | Page::LeaveHistory => {
                Role::Employee
            }
            Page::ManagerDashboard | Page::ApproveRequests | Page::TeamCalendar => Role::Manager,
            Page::AdminDashboard => Role::Admin,
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        Page::iter().find(|page| page.path() == path)
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";

pub fn landing_page(role: Role) -> Page {
    match role {
        Role::Employee => Page::EmployeeDashboard,
        Role::Manager => Page::ManagerDashboard,
        Role::Admin => Page::AdminDashboard,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub path: &'static str,
}

impl From<Page> for NavLink {
    fn from(page: Page) -> Self {
        NavLink {
            name: page.title(),
            path: page.path(),
        }
    }
}

/// Declarative answer to "what can this role do", so the presentation layer
/// can branch on data instead of re-deriving the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub role: Role,
    pub actions: BTreeSet<Action>,
    pub links: Vec<NavLink>,
    pub landing: &'static str,
}

impl PermissionSet {
    pub fn for_role(role: Role) -> Self {
        let actions = match role {
            Role::Employee => vec![
                Action::CreateRequest,
                Action::ReadRequests,
                Action::ReadBalance,
                Action::ReadCalendar,
            ],
            Role::Manager | Role::Admin => vec![
                Action::ReadAllRequests,
                Action::ReadTeamCalendar,
                Action::ReadEmployees,
                Action::DecideRequest,
            ],
        };

        let links = match role {
            Role::Employee => vec![
                Page::EmployeeDashboard,
                Page::ApplyLeave,
                Page::LeaveCalendar,
                Page::LeaveHistory,
            ],
            Role::Manager => vec![Page::ManagerDashboard, Page::ApproveRequests, Page::TeamCalendar],
            Role::Admin => vec![Page::AdminDashboard],
        };

        PermissionSet {
            role,
            actions: actions.into_iter().collect(),
            links: links.into_iter().map(NavLink::from).collect(),
            landing: landing_page(role).path(),
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum RouteDecision {
    Render(&'static str),
    Redirect(&'static str),
}

/// Gates a client path for a (possibly anonymous) role.
pub fn resolve_route(role: Option<Role>, path: &str) -> RouteDecision {
    let trimmed = path.trim_end_matches('/');
    match role {
        None if trimmed == LOGIN_PATH => RouteDecision::Render(LOGIN_PATH),
        None if trimmed == SIGNUP_PATH => RouteDecision::Render(SIGNUP_PATH),
        None => RouteDecision::Redirect(LOGIN_PATH),
        Some(role) => match Page::from_path(trimmed) {
            Some(page) if page.role() == role => RouteDecision::Render(page.path()),
            _ => RouteDecision::Redirect(landing_page(role).path()),
        },
    }
}
