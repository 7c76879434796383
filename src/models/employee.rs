//! Employee models and service-assignment payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// An employee of a business.
///
/// The embedded `user` record is present on detail responses and absent on
/// relationship rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub business_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Display name from the embedded user record, if any
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map(|u| u.full_name.as_str()).unwrap_or("-")
    }
}

/// Batch payload for assigning or removing employee services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignServicesRequest {
    pub service_ids: Vec<i64>,
}
