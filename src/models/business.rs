//! Business entity and update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A business as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Free-form appearance settings (palette keys vary per theme)
    #[serde(default)]
    pub color_scheme: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `PUT businesses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: String,
}

/// Payload for `PATCH businesses/{id}/appearance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppearanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<serde_json::Value>,
}
