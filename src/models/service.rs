//! Bookable service models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable service offered by a business, unique by id within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Duration in minutes
    pub duration: u32,
    pub price: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Service {
    /// Human-readable duration, e.g. "1h 23m"
    pub fn duration_label(&self) -> String {
        crate::utils::format_duration(self.duration)
    }
}

/// Payload for creating or updating a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: u32,
    pub price: i64,
}
