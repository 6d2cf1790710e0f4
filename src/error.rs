use derive_more::{Display, Error};
use serde::Serialize;
use strum_macros::{AsRefStr, Display as StrumDisplay};
use uuid::Uuid;

use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::policy::Action;
use crate::store::StorageError;

/// Every failure the leave core reports. Each variant carries the offending
/// field or request id so the presentation layer can word a specific message.
#[derive(Debug, Display, Error)]
pub enum LeaveError {
    #[display(fmt = "invalid {}: {}", field, message)]
    Validation {
        field: &'static str,
        message: String,
    },

    #[display(fmt = "leave request {} is already {}", request_id, status)]
    InvalidTransition {
        request_id: Uuid,
        status: LeaveStatus,
    },

    #[display(fmt = "user {} is not allowed to {}", actor_id, action)]
    Authorization { actor_id: u64, action: Action },

    #[display(
        fmt = "requested {} {} days but only {} available",
        requested,
        leave_type,
        available
    )]
    BalanceExceeded {
        leave_type: LeaveType,
        requested: i64,
        available: i64,
    },

    #[display(fmt = "leave request {} not found", request_id)]
    NotFound { request_id: Uuid },

    #[display(fmt = "storage failure: {}", source)]
    Storage { source: StorageError },
}

/// Stable, serializable tag for a [`LeaveError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, StrumDisplay, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidTransition,
    Authorization,
    BalanceExceeded,
    NotFound,
    Storage,
}

impl LeaveError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LeaveError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LeaveError::Validation { .. } => ErrorKind::Validation,
            LeaveError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            LeaveError::Authorization { .. } => ErrorKind::Authorization,
            LeaveError::BalanceExceeded { .. } => ErrorKind::BalanceExceeded,
            LeaveError::NotFound { .. } => ErrorKind::NotFound,
            LeaveError::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Field the caller got wrong, for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LeaveError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Request the failure refers to, when there is one.
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            LeaveError::InvalidTransition { request_id, .. }
            | LeaveError::NotFound { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

impl From<StorageError> for LeaveError {
    fn from(source: StorageError) -> Self {
        LeaveError::Storage { source }
    }
}
