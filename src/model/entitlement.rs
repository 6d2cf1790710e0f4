use serde::{Deserialize, Serialize};

use super::leave_request::LeaveType;

/// Days allotted to one employee for one leave type over the current period.
/// Assigned by HR outside this crate and never changed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEntitlement {
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub total_days: i64,
}

impl LeaveEntitlement {
    pub fn new(employee_id: u64, leave_type: LeaveType, total_days: i64) -> Self {
        Self {
            employee_id,
            leave_type,
            total_days,
        }
    }
}
