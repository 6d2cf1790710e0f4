//! Projects leave requests onto all-day calendar events.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use uuid::Uuid;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::User;

pub const UNKNOWN_EMPLOYEE: &str = "Unknown employee";

/// Palette owned by the core. Rendering the hex value is up to the client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorKey {
    Green,
    Amber,
    Red,
    Blue,
    Violet,
    Pink,
    Orange,
    Gray,
}

impl ColorKey {
    /// Status wins; the leave type is only consulted when there is no status.
    pub fn resolve(status: Option<LeaveStatus>, leave_type: Option<LeaveType>) -> Self {
        match (status, leave_type) {
            (Some(LeaveStatus::Approved), _) => ColorKey::Green,
            (Some(LeaveStatus::Pending), _) => ColorKey::Amber,
            (Some(LeaveStatus::Rejected), _) => ColorKey::Red,
            (None, Some(LeaveType::Sick)) => ColorKey::Blue,
            (None, Some(LeaveType::Casual)) => ColorKey::Violet,
            (None, Some(LeaveType::Paid)) => ColorKey::Pink,
            (None, Some(LeaveType::Vacation)) => ColorKey::Orange,
            (None, None) => ColorKey::Gray,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorKey::Green => "#22C55E",
            ColorKey::Amber => "#F59E0B",
            ColorKey::Red => "#EF4444",
            ColorKey::Blue => "#3B82F6",
            ColorKey::Violet => "#8B5CF6",
            ColorKey::Pink => "#EC4899",
            ColorKey::Orange => "#F97316",
            ColorKey::Gray => "#6B7280",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub request_id: Uuid,
    pub title: String,
    /// First day off, inclusive.
    pub start: NaiveDate,
    /// Last day off, inclusive.
    pub end: NaiveDate,
    pub all_day: bool,
    pub status: LeaveStatus,
    pub color: ColorKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn ordered(mut events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    events.sort_by(|a, b| {
        (a.start, a.end, a.request_id).cmp(&(b.start, b.end, b.request_id))
    });
    events
}

/// An employee's own calendar: every request, whatever its status.
pub fn project_personal(requests: &[LeaveRequest]) -> Vec<CalendarEvent> {
    let events = requests
        .iter()
        .map(|request| CalendarEvent {
            request_id: request.id,
            title: format!("{} ({})", request.leave_type, request.status),
            start: request.start_date,
            end: request.end_date,
            all_day: true,
            status: request.status,
            color: ColorKey::resolve(Some(request.status), Some(request.leave_type)),
            employee: None,
            reason: None,
        })
        .collect();
    ordered(events)
}

/// The shared team calendar. Only approved leave is ever shown here.
pub fn project_team(requests: &[LeaveRequest], directory: &[User]) -> Vec<CalendarEvent> {
    let names: HashMap<u64, &str> = directory
        .iter()
        .map(|user| (user.id, user.name.as_str()))
        .collect();

    let events = requests
        .iter()
        .filter(|request| request.status == LeaveStatus::Approved)
        .map(|request| CalendarEvent {
            request_id: request.id,
            title: request.leave_type.to_string(),
            start: request.start_date,
            end: request.end_date,
            all_day: true,
            status: LeaveStatus::Approved,
            color: ColorKey::Green,
            employee: Some(
                names
                    .get(&request.employee_id)
                    .copied()
                    .unwrap_or(UNKNOWN_EMPLOYEE)
                    .to_string(),
            ),
            reason: Some(request.reason.clone()),
        })
        .collect();
    ordered(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use chrono::{TimeZone, Utc};

    fn request(employee_id: u64, leave_type: LeaveType, start_day: u32, status: LeaveStatus) -> LeaveRequest {
        let start = NaiveDate::from_ymd_opt(2026, 7, start_day).unwrap();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id,
            leave_type,
            start_date: start,
            end_date: start + chrono::Duration::days(1),
            reason: format!("reason {start_day}"),
            status,
            manager_comment: None,
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn directory() -> Vec<User> {
        vec![User {
            id: 1,
            name: "Asha Rao".to_string(),
            role: Role::Employee,
        }]
    }

    #[test]
    fn status_decides_the_color_before_type() {
        assert_eq!(ColorKey::resolve(Some(LeaveStatus::Approved), Some(LeaveType::Sick)), ColorKey::Green);
        assert_eq!(ColorKey::resolve(Some(LeaveStatus::Pending), Some(LeaveType::Paid)), ColorKey::Amber);
        assert_eq!(ColorKey::resolve(Some(LeaveStatus::Rejected), None), ColorKey::Red);
        assert_eq!(ColorKey::resolve(None, Some(LeaveType::Casual)), ColorKey::Violet);
        assert_eq!(ColorKey::resolve(None, Some(LeaveType::Vacation)).hex(), "#F97316");
        assert_eq!(ColorKey::resolve(None, None), ColorKey::Gray);
    }

    #[test]
    fn personal_view_shows_every_request() {
        let requests = vec![
            request(1, LeaveType::Sick, 20, LeaveStatus::Rejected),
            request(1, LeaveType::Casual, 3, LeaveStatus::Pending),
            request(1, LeaveType::Paid, 10, LeaveStatus::Approved),
        ];
        let events = project_personal(&requests);

        assert_eq!(events.len(), 3);
        let titles: Vec<_> = events.iter().map(|event| event.title.as_str()).collect();
        assert_eq!(titles, ["casual (pending)", "paid (approved)", "sick (rejected)"]);
        let colors: Vec<_> = events.iter().map(|event| event.color).collect();
        assert_eq!(colors, [ColorKey::Amber, ColorKey::Green, ColorKey::Red]);
        assert!(events.iter().all(|event| event.all_day && event.employee.is_none()));
        assert_eq!(events[0].end, NaiveDate::from_ymd_opt(2026, 7, 4).unwrap());
    }

    #[test]
    fn team_view_hides_everything_but_approved() {
        let requests = vec![
            request(1, LeaveType::Sick, 5, LeaveStatus::Pending),
            request(1, LeaveType::Vacation, 8, LeaveStatus::Approved),
            request(2, LeaveType::Casual, 9, LeaveStatus::Rejected),
            request(2, LeaveType::Paid, 1, LeaveStatus::Approved),
        ];
        let events = project_team(&requests, &directory());

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.status == LeaveStatus::Approved));
        assert!(events.iter().all(|event| event.color == ColorKey::Green));
        assert_eq!(events[0].title, "paid");
        assert_eq!(events[0].employee.as_deref(), Some(UNKNOWN_EMPLOYEE));
        assert_eq!(events[1].employee.as_deref(), Some("Asha Rao"));
        assert_eq!(events[1].reason.as_deref(), Some("reason 8"));
    }
}
