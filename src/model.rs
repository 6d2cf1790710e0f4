pub mod entitlement;
pub mod leave_request;
pub mod role;
pub mod user;

pub use entitlement::LeaveEntitlement;
pub use leave_request::{DecisionAction, LeaveDraft, LeaveRequest, LeaveStatus, LeaveType};
pub use role::Role;
pub use user::{Actor, User, UserSummary};
