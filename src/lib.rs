//! Leave lifecycle and balance accounting, plus the actix-web shell that
//! serves it.
//!
//! The core (`model`, `balance`, `calendar`, `policy`, `dashboard`) is pure:
//! it takes plain values and returns new ones. `service` joins it to a
//! [`store::LeaveStore`]; `api`, `auth` and `routes` expose the service over HTTP.

pub mod api;
pub mod auth;
pub mod balance;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod docs;
pub mod error;
pub mod model;
pub mod policy;
pub mod routes;
pub mod service;
pub mod store;

pub use error::{ErrorKind, LeaveError};
pub use service::{Clock, LeaveService, SystemClock};
