//! # HabitArc Lite: Response DTOs
//!
//! Conventions:
//! - `*Request` types live beside their models and are validated with
//!   `validator` derive macros
//! - `*Response` → serialized to client JSON
//! - Derived values (streaks, target percentages) are computed on every read

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::entry::HabitEntry;
use crate::models::habit::{Habit, HabitFrequency};
use crate::services::stats;

// ============================================================================
// Common
// ============================================================================

/// Stable error envelope, shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Habits
// ============================================================================

/// Habit with today's status (GET/POST /api/habits, GET/PUT /api/habits/{id})
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub frequency: HabitFrequency,
    pub target_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub current_streak: i32,
    pub total_entries: i64,
    pub completed_today: i64,
    pub is_completed_today: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HabitResponse {
    pub fn new(habit: Habit, entries: &[HabitEntry], now: DateTime<Utc>) -> Self {
        Self {
            current_streak: stats::current_streak(&habit, entries, now),
            total_entries: entries.len() as i64,
            completed_today: stats::completed_today(entries, now),
            is_completed_today: stats::is_completed_today(&habit, entries, now),
            id: habit.id,
            name: habit.name,
            description: habit.description,
            category: habit.category,
            unit: habit.unit,
            color: habit.color,
            frequency: habit.frequency,
            target_count: habit.target_count,
            target_value: habit.target_value,
            start_date: habit.start_date,
            end_date: habit.end_date,
            is_active: habit.is_active,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Entry decorated with its parent habit's target comparison
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    #[serde(flatten)]
    pub entry: HabitEntry,
    pub meets_target: bool,
    pub target_percentage: Option<f64>,
}

impl EntryResponse {
    pub fn new(entry: HabitEntry, habit: &Habit) -> Self {
        Self {
            meets_target: stats::meets_target(&entry, habit),
            target_percentage: stats::target_percentage(&entry, habit),
            entry,
        }
    }
}

/// Streak counters recomputed after a completion
#[derive(Debug, Serialize)]
pub struct StreakSummary {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_completions: i64,
    pub is_completed_today: bool,
}

/// Response for POST /api/habits/{id}/complete
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub entry: EntryResponse,
    pub habit: StreakSummary,
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: bool,
}
