use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CompletionResponse, EntryResponse, StreakSummary};
use crate::error::{AppError, AppResult};
use crate::models::entry::{CreateEntryRequest, HabitEntry, UpdateEntryRequest};
use crate::models::habit::Habit;
use crate::services::{habits, stats};

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Pair each entry with its parent habit. Entries whose habit is not in
/// `habits` are dropped.
fn decorate(entries: Vec<HabitEntry>, habits: &HashMap<Uuid, Habit>) -> Vec<EntryResponse> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let habit = habits.get(&entry.habit_id)?;
            Some(EntryResponse::new(entry, habit))
        })
        .collect()
}

async fn owned_habits(db: &SqlitePool, owner: Uuid) -> AppResult<HashMap<Uuid, Habit>> {
    let habits = sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE user_id = ?1")
        .bind(owner)
        .fetch_all(db)
        .await?;
    Ok(habits.into_iter().map(|h| (h.id, h)).collect())
}

async fn require_owned(
    db: &SqlitePool,
    owner: Uuid,
    entry_id: Uuid,
) -> AppResult<(HabitEntry, Habit)> {
    let entry = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT e.* FROM habit_entries e
        JOIN habits h ON h.id = e.habit_id
        WHERE e.id = ?1 AND h.user_id = ?2
        "#,
    )
    .bind(entry_id)
    .bind(owner)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;

    let habit = habits::fetch_owned(db, owner, entry.habit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;
    Ok((entry, habit))
}

/// The habit an entry is being logged against; a missing or foreign habit is
/// a bad reference rather than a missing resource.
async fn referenced_habit(db: &SqlitePool, owner: Uuid, habit_id: Uuid) -> AppResult<Habit> {
    habits::fetch_owned(db, owner, habit_id)
        .await?
        .ok_or_else(|| AppError::InvalidReference("Referenced habit not found".into()))
}

#[tracing::instrument(skip(db))]
pub async fn list(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Option<Uuid>,
) -> AppResult<Vec<EntryResponse>> {
    let entries = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT e.* FROM habit_entries e
        JOIN habits h ON h.id = e.habit_id
        WHERE h.user_id = ?1 AND (?2 IS NULL OR e.habit_id = ?2)
        ORDER BY e.completed_at DESC
        "#,
    )
    .bind(owner)
    .bind(habit_id)
    .fetch_all(db)
    .await?;

    let habits = owned_habits(db, owner).await?;
    Ok(decorate(entries, &habits))
}

#[tracing::instrument(skip(db))]
pub async fn list_for_habit(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Uuid,
) -> AppResult<Vec<EntryResponse>> {
    let habit = habits::fetch_owned(db, owner, habit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".into()))?;
    let entries = habits::entries_for(db, habit.id).await?;
    Ok(entries
        .into_iter()
        .map(|entry| EntryResponse::new(entry, &habit))
        .collect())
}

/// Entries whose UTC calendar date is `date`.
#[tracing::instrument(skip(db))]
pub async fn list_by_date(
    db: &SqlitePool,
    owner: Uuid,
    date: NaiveDate,
) -> AppResult<Vec<EntryResponse>> {
    let day_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let day_end = day_start + Duration::days(1);

    let entries = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT e.* FROM habit_entries e
        JOIN habits h ON h.id = e.habit_id
        WHERE h.user_id = ?1 AND e.completed_at >= ?2 AND e.completed_at < ?3
        ORDER BY e.completed_at DESC
        "#,
    )
    .bind(owner)
    .bind(day_start)
    .bind(day_end)
    .fetch_all(db)
    .await?;

    let habits = owned_habits(db, owner).await?;
    Ok(decorate(entries, &habits))
}

#[tracing::instrument(skip(db))]
pub async fn list_recent(
    db: &SqlitePool,
    owner: Uuid,
    limit: Option<i64>,
) -> AppResult<Vec<EntryResponse>> {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    let entries = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT e.* FROM habit_entries e
        JOIN habits h ON h.id = e.habit_id
        WHERE h.user_id = ?1
        ORDER BY e.completed_at DESC
        LIMIT ?2
        "#,
    )
    .bind(owner)
    .bind(limit)
    .fetch_all(db)
    .await?;

    let habits = owned_habits(db, owner).await?;
    Ok(decorate(entries, &habits))
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &SqlitePool, owner: Uuid, entry_id: Uuid) -> AppResult<EntryResponse> {
    let (entry, habit) = require_owned(db, owner, entry_id).await?;
    Ok(EntryResponse::new(entry, &habit))
}

#[tracing::instrument(skip(db, body, now), fields(habit_id = %body.habit_id))]
pub async fn create(
    db: &SqlitePool,
    owner: Uuid,
    body: CreateEntryRequest,
    now: DateTime<Utc>,
) -> AppResult<EntryResponse> {
    body.validate()?;
    let habit = referenced_habit(db, owner, body.habit_id).await?;
    let entry = insert_entry(db, &habit, &body, now).await?;
    Ok(EntryResponse::new(entry, &habit))
}

/// Log a single completion for now and return the recomputed streaks.
#[tracing::instrument(skip(db, now))]
pub async fn complete(
    db: &SqlitePool,
    owner: Uuid,
    habit_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<CompletionResponse> {
    let habit = referenced_habit(db, owner, habit_id).await?;
    let body = CreateEntryRequest::completion(habit.id, now);
    let entry = insert_entry(db, &habit, &body, now).await?;

    let entries = habits::entries_for(db, habit.id).await?;
    let summary = StreakSummary {
        current_streak: stats::current_streak(&habit, &entries, now),
        longest_streak: stats::longest_streak(&habit, &entries),
        total_completions: entries.len() as i64,
        is_completed_today: stats::is_completed_today(&habit, &entries, now),
    };
    tracing::debug!(
        %habit_id,
        current_streak = summary.current_streak,
        longest_streak = summary.longest_streak,
        "Streak recomputed"
    );

    Ok(CompletionResponse {
        entry: EntryResponse::new(entry, &habit),
        habit: summary,
    })
}

/// Persists `body` against an already resolved habit.
async fn insert_entry(
    db: &SqlitePool,
    habit: &Habit,
    body: &CreateEntryRequest,
    now: DateTime<Utc>,
) -> AppResult<HabitEntry> {
    let entry = sqlx::query_as::<_, HabitEntry>(
        r#"
        INSERT INTO habit_entries (
            id, habit_id, completed_at, count, actual_value, note, location, weather,
            rating, duration_minutes, is_manual_entry, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(habit.id)
    .bind(body.completed_at.unwrap_or(now))
    .bind(body.count.unwrap_or(1))
    .bind(body.actual_value)
    .bind(&body.note)
    .bind(&body.location)
    .bind(&body.weather)
    .bind(body.rating)
    .bind(body.duration_minutes)
    .bind(body.is_manual_entry.unwrap_or(true))
    .bind(now)
    .fetch_one(db)
    .await?;

    tracing::info!(entry_id = %entry.id, "Entry created");
    Ok(entry)
}

#[tracing::instrument(skip(db, body, now))]
pub async fn update(
    db: &SqlitePool,
    owner: Uuid,
    entry_id: Uuid,
    body: UpdateEntryRequest,
    now: DateTime<Utc>,
) -> AppResult<EntryResponse> {
    body.validate()?;
    let (_, habit) = require_owned(db, owner, entry_id).await?;

    let entry = sqlx::query_as::<_, HabitEntry>(
        r#"
        UPDATE habit_entries SET
            completed_at = COALESCE(?2, completed_at),
            count = COALESCE(?3, count),
            actual_value = COALESCE(?4, actual_value),
            note = COALESCE(?5, note),
            location = COALESCE(?6, location),
            weather = COALESCE(?7, weather),
            rating = COALESCE(?8, rating),
            duration_minutes = COALESCE(?9, duration_minutes),
            updated_at = ?10
        WHERE id = ?1
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(body.completed_at)
    .bind(body.count)
    .bind(body.actual_value)
    .bind(&body.note)
    .bind(&body.location)
    .bind(&body.weather)
    .bind(body.rating)
    .bind(body.duration_minutes)
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(EntryResponse::new(entry, &habit))
}

#[tracing::instrument(skip(db))]
pub async fn delete(db: &SqlitePool, owner: Uuid, entry_id: Uuid) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM habit_entries
        WHERE id = ?1 AND habit_id IN (SELECT id FROM habits WHERE user_id = ?2)
        "#,
    )
    .bind(entry_id)
    .bind(owner)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    tracing::info!(%entry_id, "Entry deleted");
    Ok(())
}
