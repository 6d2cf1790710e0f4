//! Used / pending / available accounting per leave type.
//!
//! Balances are always derived from the current request list and entitlement
//! table. Nothing here is cached and `available` is never clamped: a negative
//! value means the entitlement table and the approved requests disagree and
//! has to be surfaced as such.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::LeaveError;
use crate::model::entitlement::LeaveEntitlement;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBalance {
    pub total_days: i64,
    pub used: i64,
    pub pending: i64,
    pub available: i64,
    /// False when requests exist for a type the employee holds no entitlement for.
    pub entitled: bool,
}

impl TypeBalance {
    pub fn is_overdrawn(&self) -> bool {
        self.available < 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub per_type: BTreeMap<LeaveType, TypeBalance>,
    pub total_days: i64,
    pub used_days: i64,
    pub pending_days: i64,
    pub available: i64,
}

impl BalanceSnapshot {
    pub fn compute(entitlements: &[LeaveEntitlement], requests: &[LeaveRequest]) -> Self {
        let mut per_type: BTreeMap<LeaveType, TypeBalance> = BTreeMap::new();

        for entitlement in entitlements {
            let entry = per_type.entry(entitlement.leave_type).or_insert(TypeBalance {
                total_days: 0,
                used: 0,
                pending: 0,
                available: 0,
                entitled: true,
            });
            entry.total_days += entitlement.total_days;
        }

        for request in requests {
            let consumed = request.duration_days();
            let entry = per_type.entry(request.leave_type).or_insert(TypeBalance {
                total_days: 0,
                used: 0,
                pending: 0,
                available: 0,
                entitled: false,
            });
            match request.status {
                LeaveStatus::Approved => entry.used += consumed,
                LeaveStatus::Pending => entry.pending += consumed,
                LeaveStatus::Rejected => {}
            }
        }

        let mut snapshot = BalanceSnapshot {
            per_type,
            total_days: 0,
            used_days: 0,
            pending_days: 0,
            available: 0,
        };

        for balance in snapshot.per_type.values_mut() {
            if !balance.entitled {
                continue;
            }
            balance.available = balance.total_days - balance.used - balance.pending;
            snapshot.total_days += balance.total_days;
            snapshot.used_days += balance.used;
            snapshot.pending_days += balance.pending;
            snapshot.available += balance.available;
        }

        snapshot
    }

    /// Days still requestable for a type. Types without an entitlement have none.
    pub fn available_for(&self, leave_type: LeaveType) -> i64 {
        self.per_type
            .get(&leave_type)
            .map(|balance| balance.available)
            .unwrap_or(0)
    }

    /// Types whose numbers do not add up: negative availability, or days
    /// booked against a type with no entitlement.
    pub fn inconsistencies(&self) -> Vec<LeaveType> {
        self.per_type
            .iter()
            .filter(|(_, balance)| balance.is_overdrawn() || !balance.entitled)
            .map(|(leave_type, _)| *leave_type)
            .collect()
    }
}

fn available_excluding(
    entitlements: &[LeaveEntitlement],
    existing: &[LeaveRequest],
    candidate: &LeaveRequest,
) -> i64 {
    let others: Vec<LeaveRequest> = existing
        .iter()
        .filter(|request| request.id != candidate.id && request.leave_type == candidate.leave_type)
        .cloned()
        .collect();
    let relevant: Vec<LeaveEntitlement> = entitlements
        .iter()
        .filter(|entitlement| entitlement.leave_type == candidate.leave_type)
        .cloned()
        .collect();

    BalanceSnapshot::compute(&relevant, &others).available_for(candidate.leave_type)
}

/// Whether `candidate` fits in what is left of its leave type. Must be called
/// with freshly loaded data, never a cached snapshot.
pub fn can_request(
    entitlements: &[LeaveEntitlement],
    existing: &[LeaveRequest],
    candidate: &LeaveRequest,
) -> bool {
    candidate.duration_days() <= available_excluding(entitlements, existing, candidate)
}

pub fn ensure_can_request(
    entitlements: &[LeaveEntitlement],
    existing: &[LeaveRequest],
    candidate: &LeaveRequest,
) -> Result<(), LeaveError> {
    let available = available_excluding(entitlements, existing, candidate);
    let requested = candidate.duration_days();
    if requested > available {
        return Err(LeaveError::BalanceExceeded {
            leave_type: candidate.leave_type,
            requested,
            available,
        });
    }
    Ok(())
}
