//! Persistence boundary. The core only talks to storage through [`LeaveStore`]
//! and passes its failures through untouched.

pub mod memory;

use derive_more::{Display, Error};
use uuid::Uuid;

use crate::error::LeaveError;
use crate::model::entitlement::LeaveEntitlement;
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::user::User;

pub use memory::MemoryStore;

#[derive(Debug, Display, Error)]
pub enum StorageError {
    #[display(fmt = "store unavailable: {}", reason)]
    Unavailable { reason: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestScope {
    Employee(u64),
    All,
}

/// Unit of write serialization: one employee's balance for one leave type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WriterKey {
    pub employee_id: u64,
    pub leave_type: LeaveType,
}

impl WriterKey {
    pub fn of(request: &LeaveRequest) -> Self {
        WriterKey {
            employee_id: request.employee_id,
            leave_type: request.leave_type,
        }
    }
}

/// Operation run while a writer slot is held.
pub type WriterOp<'a> = &'a mut dyn FnMut() -> Result<LeaveRequest, LeaveError>;

pub trait LeaveStore: Send + Sync {
    /// Requests in scope, newest first.
    fn load_requests(&self, scope: RequestScope) -> Result<Vec<LeaveRequest>, StorageError>;

    fn load_request(&self, id: Uuid) -> Result<Option<LeaveRequest>, StorageError>;

    fn load_entitlements(&self, employee_id: u64) -> Result<Vec<LeaveEntitlement>, StorageError>;

    fn load_users(&self) -> Result<Vec<User>, StorageError>;

    /// Inserts or replaces the request with the same id.
    fn save_request(&self, request: &LeaveRequest) -> Result<(), StorageError>;

    /// Runs `op` with exclusive write access for `key`. No two operations for
    /// the same key may overlap, so a read-check-save inside `op` cannot race
    /// another one for the same employee and leave type.
    fn serialize_writer(&self, key: WriterKey, op: WriterOp<'_>) -> Result<LeaveRequest, LeaveError>;
}
