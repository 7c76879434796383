//! API data models split into domain-specific modules.
//!
//! These are value-like DTOs mirrored 1:1 from server responses; the client
//! never derives persistent state of its own.

pub mod appointment;
pub mod business;
pub mod employee;
pub mod schedule;
pub mod service;
pub mod user;

pub use appointment::*;
pub use business::*;
pub use employee::*;
pub use schedule::*;
pub use service::*;
pub use user::*;
