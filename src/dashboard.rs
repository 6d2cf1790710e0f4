use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;
use crate::model::user::{User, UserSummary};

/// How many requests the manager dashboard lists.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(requests: &[LeaveRequest]) -> Self {
        requests.iter().fold(StatusCounts::default(), |mut counts, request| {
            counts.total += 1;
            match request.status {
                LeaveStatus::Pending => counts.pending += 1,
                LeaveStatus::Approved => counts.approved += 1,
                LeaveStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }
}

/// Badge number for the approvals link. Callers poll this against a fresh load.
pub fn pending_count(requests: &[LeaveRequest]) -> usize {
    requests
        .iter()
        .filter(|request| request.status == LeaveStatus::Pending)
        .count()
}

/// Newest first by creation time.
pub fn recent(requests: &[LeaveRequest], limit: usize) -> Vec<LeaveRequest> {
    let mut sorted = requests.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Leave history filter. `status: None` means all statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    pub status: Option<LeaveStatus>,
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, request: &LeaveRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }

        let term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };

        request.leave_type.as_ref().contains(&term)
            || request.start_date.format("%-d/%-m/%Y").to_string().contains(&term)
    }

    pub fn apply(&self, requests: &[LeaveRequest]) -> Vec<LeaveRequest> {
        requests
            .iter()
            .filter(|request| self.matches(request))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestHistory {
    pub counts: StatusCounts,
    pub requests: Vec<LeaveRequest>,
}

/// A request as the approvals screen lists it, with its owner attached.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRequest {
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub employee: Option<UserSummary>,
}

pub fn with_employees(requests: &[LeaveRequest], users: &[User]) -> Vec<TeamRequest> {
    let by_id: HashMap<u64, &User> = users.iter().map(|user| (user.id, user)).collect();
    requests
        .iter()
        .map(|request| TeamRequest {
            request: request.clone(),
            employee: by_id.get(&request.employee_id).map(|user| user.summary()),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub counts: StatusCounts,
    pub employee_count: usize,
    pub recent: Vec<TeamRequest>,
}

impl ManagerDashboard {
    pub fn build(requests: &[LeaveRequest], users: &[User]) -> Self {
        ManagerDashboard {
            counts: StatusCounts::tally(requests),
            employee_count: users.iter().filter(|user| user.role == Role::Employee).count(),
            recent: with_employees(&recent(requests, RECENT_LIMIT), users),
        }
    }
}
