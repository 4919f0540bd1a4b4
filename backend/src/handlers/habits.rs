use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::{CompletionResponse, EntryResponse, HabitResponse};
use crate::error::AppResult;
use crate::identity::Identity;
use crate::models::habit::{CreateHabitRequest, HabitQuery, UpdateHabitRequest};
use crate::services::{entries, habits, stats::HabitStats};
use crate::AppState;

pub async fn list_habits(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<HabitQuery>,
) -> AppResult<Json<Vec<HabitResponse>>> {
    let habits = habits::list(&state.db, identity.user_id, &query, state.clock.now()).await?;
    Ok(Json(habits))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<HabitResponse>> {
    let habit = habits::get(&state.db, identity.user_id, habit_id, state.clock.now()).await?;
    Ok(Json(habit))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<(StatusCode, Json<HabitResponse>)> {
    let habit = habits::create(&state.db, identity.user_id, body, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
    Json(body): Json<UpdateHabitRequest>,
) -> AppResult<Json<HabitResponse>> {
    let now = state.clock.now();
    let habit = habits::update(&state.db, identity.user_id, habit_id, body, now).await?;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    habits::delete(&state.db, identity.user_id, habit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_habit_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<HabitStats>> {
    let stats = habits::stats(&state.db, identity.user_id, habit_id, state.clock.now()).await?;
    Ok(Json(stats))
}

pub async fn list_habit_entries(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<Vec<EntryResponse>>> {
    let entries = entries::list_for_habit(&state.db, identity.user_id, habit_id).await?;
    Ok(Json(entries))
}

/// One-click completion: logs a single count for now.
pub async fn complete_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<CompletionResponse>)> {
    let now = state.clock.now();
    let completion = entries::complete(&state.db, identity.user_id, habit_id, now).await?;
    Ok((StatusCode::CREATED, Json(completion)))
}
