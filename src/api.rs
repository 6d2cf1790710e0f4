pub mod error;
pub mod leave_request;
pub mod manager;
pub mod session;
