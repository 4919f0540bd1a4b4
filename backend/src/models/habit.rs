use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub color: Option<String>,
    pub frequency: HabitFrequency,
    pub target_count: i32,
    pub target_value: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be under 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Category must be under 50 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 20, message = "Unit must be under 20 characters"))]
    pub unit: Option<String>,

    #[validate(length(max = 20, message = "Color must be under 20 characters"))]
    pub color: Option<String>,

    /// Default: "daily"
    pub frequency: Option<HabitFrequency>,

    /// Completions needed per day to mark it as met. Default: 1
    #[validate(range(min = 1, max = 1000, message = "Target count must be 1-1000"))]
    pub target_count: Option<i32>,

    #[validate(range(min = 0.0, message = "Target value must not be negative"))]
    pub target_value: Option<f64>,

    /// Default: now
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Partial update, absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be under 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Category must be under 50 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 20, message = "Unit must be under 20 characters"))]
    pub unit: Option<String>,

    #[validate(length(max = 20, message = "Color must be under 20 characters"))]
    pub color: Option<String>,

    pub frequency: Option<HabitFrequency>,

    #[validate(range(min = 1, max = 1000, message = "Target count must be 1-1000"))]
    pub target_count: Option<i32>,

    #[validate(range(min = 0.0, message = "Target value must not be negative"))]
    pub target_value: Option<f64>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HabitQuery {
    pub active: Option<bool>,
}
