use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use super::user::Actor;
use crate::error::LeaveError;
use crate::policy::{self, Action, Resource};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd,
    Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveType {
    Sick,
    Casual,
    Paid,
    Vacation,
}

impl LeaveType {
    pub fn parse(value: &str) -> Result<Self, LeaveError> {
        value.trim().parse().map_err(|_| {
            LeaveError::validation(
                "leave_type",
                format!("unknown leave type {value:?}, allowed: sick, casual, paid, vacation"),
            )
        })
    }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    pub fn parse(value: &str) -> Result<Self, LeaveError> {
        value
            .trim()
            .parse()
            .map_err(|_| LeaveError::validation("action", "must be \"approve\" or \"reject\""))
    }

    fn outcome(self) -> LeaveStatus {
        match self {
            DecisionAction::Approve => LeaveStatus::Approved,
            DecisionAction::Reject => LeaveStatus::Rejected,
        }
    }
}

/// What an employee fills in before the request exists. The leave type
/// stays raw text so that an unknown type is reported as a validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDraft {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub manager_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Validates a draft and opens a pending request owned by `employee_id`.
    pub fn create(
        employee_id: u64,
        draft: LeaveDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, LeaveError> {
        let leave_type = LeaveType::parse(&draft.leave_type)?;

        let reason = draft.reason.trim();
        if reason.is_empty() {
            return Err(LeaveError::validation("reason", "must not be empty"));
        }

        if draft.end_date < draft.start_date {
            return Err(LeaveError::validation(
                "end_date",
                "end date cannot be before start date",
            ));
        }

        if draft.start_date < today || draft.end_date < today {
            return Err(LeaveError::validation(
                "start_date",
                format!("past dates are not allowed (today is {today})"),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            employee_id,
            leave_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            manager_comment: None,
            created_at: now,
            updated_at: None,
        })
    }

    /// Inclusive day count of the requested range.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Applies a manager decision and returns the decided copy. `self` is left
    /// untouched whether or not the decision succeeds.
    pub fn decide(
        &self,
        action: DecisionAction,
        comment: &str,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Self, LeaveError> {
        policy::authorize(
            actor,
            Action::DecideRequest,
            Resource::Request {
                owner: self.employee_id,
            },
        )?;

        if self.status.is_terminal() {
            return Err(LeaveError::InvalidTransition {
                request_id: self.id,
                status: self.status,
            });
        }

        let comment = comment.trim();
        if comment.is_empty() {
            return Err(LeaveError::validation("manager_comment", "must not be empty"));
        }

        Ok(Self {
            status: action.outcome(),
            manager_comment: Some(comment.to_string()),
            updated_at: Some(now),
            ..self.clone()
        })
    }
}
