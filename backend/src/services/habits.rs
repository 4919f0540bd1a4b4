use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::HabitResponse;
use crate::error::{AppError, AppResult};
use crate::models::entry::HabitEntry;
use crate::models::habit::{CreateHabitRequest, Habit, HabitQuery, UpdateHabitRequest};
use crate::services::stats::{self, HabitStats};

/// Load a habit the owner is allowed to see.
pub async fn fetch_owned(db: &SqlitePool, owner: Uuid, habit_id: Uuid) -> AppResult<Option<Habit>> {
    let habit = sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?1 AND user_id = ?2")
        .bind(habit_id)
        .bind(owner)
        .fetch_optional(db)
        .await?;
    Ok(habit)
}

async fn require_owned(db: &SqlitePool, owner: Uuid, habit_id: Uuid) -> AppResult<Habit> {
    fetch_owned(db, owner, habit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".into()))
}

pub async fn entries_for(db: &SqlitePool, habit_id: Uuid) -> AppResult<Vec<HabitEntry>> {
    let entries = sqlx::query_as::<_, HabitEntry>(
        "SELECT * FROM habit_entries WHERE habit_id = ?1 ORDER BY completed_at DESC",
    )
    .bind(habit_id)
    .fetch_all(db)
    .await?;
    Ok(entries)
}

#[tracing::instrument(skip(db, now))]
pub async fn list(
    db: &SqlitePool,
    owner: Uuid,
    query: &HabitQuery,
    now: DateTime<Utc>,
) -> AppResult<Vec<HabitResponse>> {
    let habits = sqlx::query_as::<_, Habit>(
        r#"
        SELECT * FROM habits
        WHERE user_id = ?1 AND (?2 IS NULL OR is_active = ?2)
        ORDER BY created_at ASC
        "#,
    )
    .bind(owner)
    .bind(query.active)
    .fetch_all(db)
    .await?;

    let entries = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT e.* FROM habit_entries e
        JOIN habits h ON h.id = e.habit_id
        WHERE h.user_id = ?1
        "#,
    )
    .bind(owner)
    .fetch_all(db)
    .await?;

    let mut by_habit: HashMap<Uuid, Vec<HabitEntry>> = HashMap::new();
    for entry in entries {
        by_habit.entry(entry.habit_id).or_default().push(entry);
    }

    Ok(habits
        .into_iter()
        .map(|habit| {
            let entries = by_habit.remove(&habit.id).unwrap_or_default();
            HabitResponse::new(habit, &entries, now)
        })
        .collect())
}

#[tracing::instrument(skip(db, now))]
pub async fn get(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<HabitResponse> {
    let habit = require_owned(db, owner, habit_id).await?;
    let entries = entries_for(db, habit.id).await?;
    Ok(HabitResponse::new(habit, &entries, now))
}

#[tracing::instrument(skip(db, body, now), fields(name = %body.name))]
pub async fn create(
    db: &SqlitePool,
    owner: Uuid,
    body: CreateHabitRequest,
    now: DateTime<Utc>,
) -> AppResult<HabitResponse> {
    body.validate()?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Habit name is required".into()));
    }

    let start_date = body.start_date.unwrap_or(now);
    check_date_range(start_date, body.end_date)?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (
            id, user_id, name, description, category, unit, color, frequency,
            target_count, target_value, start_date, end_date, is_active, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner)
    .bind(name)
    .bind(&body.description)
    .bind(&body.category)
    .bind(&body.unit)
    .bind(&body.color)
    .bind(body.frequency.unwrap_or_default())
    .bind(body.target_count.unwrap_or(1))
    .bind(body.target_value)
    .bind(start_date)
    .bind(body.end_date)
    .bind(body.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(db)
    .await?;

    tracing::info!(habit_id = %habit.id, "Habit created");
    Ok(HabitResponse::new(habit, &[], now))
}

#[tracing::instrument(skip(db, body, now))]
pub async fn update(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Uuid,
    body: UpdateHabitRequest,
    now: DateTime<Utc>,
) -> AppResult<HabitResponse> {
    body.validate()?;
    let existing = require_owned(db, owner, habit_id).await?;

    let name = body.name.as_deref().map(str::trim);
    if name.is_some_and(str::is_empty) {
        return Err(AppError::Validation("Habit name is required".into()));
    }
    check_date_range(
        body.start_date.unwrap_or(existing.start_date),
        body.end_date.or(existing.end_date),
    )?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET
            name = COALESCE(?3, name),
            description = COALESCE(?4, description),
            category = COALESCE(?5, category),
            unit = COALESCE(?6, unit),
            color = COALESCE(?7, color),
            frequency = COALESCE(?8, frequency),
            target_count = COALESCE(?9, target_count),
            target_value = COALESCE(?10, target_value),
            start_date = COALESCE(?11, start_date),
            end_date = COALESCE(?12, end_date),
            is_active = COALESCE(?13, is_active),
            updated_at = ?14
        WHERE id = ?1 AND user_id = ?2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(owner)
    .bind(name)
    .bind(&body.description)
    .bind(&body.category)
    .bind(&body.unit)
    .bind(&body.color)
    .bind(body.frequency)
    .bind(body.target_count)
    .bind(body.target_value)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(body.is_active)
    .bind(now)
    .fetch_one(db)
    .await?;

    let entries = entries_for(db, habit.id).await?;
    Ok(HabitResponse::new(habit, &entries, now))
}

/// Deletes the habit; its entries go with it through the cascading FK.
#[tracing::instrument(skip(db))]
pub async fn delete(db: &SqlitePool, owner: Uuid, habit_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM habits WHERE id = ?1 AND user_id = ?2")
        .bind(habit_id)
        .bind(owner)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Habit not found".into()));
    }

    tracing::info!(%habit_id, "Habit deleted");
    Ok(())
}

#[tracing::instrument(skip(db, now))]
pub async fn stats(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<HabitStats> {
    let habit = require_owned(db, owner, habit_id).await?;
    let entries = entries_for(db, habit.id).await?;
    Ok(stats::compute(&habit, &entries, now))
}

fn check_date_range(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> AppResult<()> {
    match end {
        Some(end) if end < start => Err(AppError::Validation(
            "end_date must not be before start_date".into(),
        )),
        _ => Ok(()),
    }
}
