//! Per-domain stores mediating all server communication.
//!
//! Every mutation is write-through: the server is called first and the
//! local cache only changes on `success: true`. Failure handling is
//! deliberately not uniform — each operation declares its [`ErrorPolicy`]
//! in its doc comment, because the calling views depend on the difference:
//!
//! | Policy | Behavior |
//! |---|---|
//! | Swallow | notify the user, return `None`, leave local state untouched |
//! | Rethrow | notify the user, then propagate the error to the caller |
//!
//! The one deliberate outlier is
//! [`ClientStore::fetch_available_time_slots`], which neither notifies nor
//! wraps — failures propagate raw.

pub mod business;
pub mod client;

pub use business::BusinessStore;
pub use client::ClientStore;

use std::future::Future;

use crate::api::ApiError;
use crate::notify::Notifier;

/// How a store operation reports failure to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Notify, return `None`, state untouched
    Swallow,
    /// Notify, then propagate
    Rethrow,
}

/// Run `op` under the swallow policy.
pub(crate) async fn swallowed<T>(
    notifier: &dyn Notifier,
    op: impl Future<Output = Result<T, ApiError>>,
) -> Option<T> {
    match op.await {
        Ok(value) => Some(value),
        Err(e) => {
            notifier.error(&e.message());
            None
        }
    }
}

/// Run `op` under the rethrow policy.
pub(crate) async fn rethrown<T>(
    notifier: &dyn Notifier,
    op: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match op.await {
        Ok(value) => Ok(value),
        Err(e) => {
            notifier.error(&e.message());
            Err(e)
        }
    }
}
