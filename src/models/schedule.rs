//! Recurring weekly schedule template models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurring weekly availability entry owned by one employee.
///
/// `day_of_week` is 0-6 starting from Sunday; only the time-of-day portion
/// of `start_time`/`end_time` is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    pub id: i64,
    pub employee_id: i64,
    pub day_of_week: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_break: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a schedule template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleTemplateRequest {
    pub day_of_week: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_break: bool,
}
