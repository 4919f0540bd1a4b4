use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HabitEntry {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub count: i32,
    pub actual_value: Option<f64>,
    pub note: Option<String>,
    pub location: Option<String>,
    pub weather: Option<String>,
    pub rating: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub is_manual_entry: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    pub habit_id: Uuid,

    /// Default: now
    pub completed_at: Option<DateTime<Utc>>,

    /// Default: 1
    #[validate(range(min = 1, max = 1000, message = "Count must be 1-1000"))]
    pub count: Option<i32>,

    #[validate(range(min = 0.0, message = "Actual value must not be negative"))]
    pub actual_value: Option<f64>,

    #[validate(length(max = 500, message = "Note must be under 500 characters"))]
    pub note: Option<String>,

    #[validate(length(max = 100, message = "Location must be under 100 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 50, message = "Weather must be under 50 characters"))]
    pub weather: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: Option<i32>,

    #[validate(range(min = 0, max = 1440, message = "Duration must be 0-1440 minutes"))]
    pub duration_minutes: Option<i32>,

    /// Default: true
    pub is_manual_entry: Option<bool>,
}

impl CreateEntryRequest {
    /// A bare one-count completion logged by the complete action.
    pub fn completion(habit_id: Uuid, completed_at: DateTime<Utc>) -> Self {
        Self {
            habit_id,
            completed_at: Some(completed_at),
            count: Some(1),
            actual_value: None,
            note: None,
            location: None,
            weather: None,
            rating: None,
            duration_minutes: None,
            is_manual_entry: Some(false),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    pub completed_at: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 1000, message = "Count must be 1-1000"))]
    pub count: Option<i32>,

    #[validate(range(min = 0.0, message = "Actual value must not be negative"))]
    pub actual_value: Option<f64>,

    #[validate(length(max = 500, message = "Note must be under 500 characters"))]
    pub note: Option<String>,

    #[validate(length(max = 100, message = "Location must be under 100 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 50, message = "Weather must be under 50 characters"))]
    pub weather: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: Option<i32>,

    #[validate(range(min = 0, max = 1440, message = "Duration must be 0-1440 minutes"))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub habit_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}
