use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::dto::EntryResponse;
use crate::error::AppResult;
use crate::identity::Identity;
use crate::models::entry::{CreateEntryRequest, EntryQuery, RecentQuery, UpdateEntryRequest};
use crate::services::entries;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<EntryResponse>>> {
    let entries = entries::list(&state.db, identity.user_id, query.habit_id).await?;
    Ok(Json(entries))
}

pub async fn list_entries_by_date(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<Vec<EntryResponse>>> {
    let entries = entries::list_by_date(&state.db, identity.user_id, date).await?;
    Ok(Json(entries))
}

pub async fn list_recent_entries(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<EntryResponse>>> {
    let entries = entries::list_recent(&state.db, identity.user_id, query.limit).await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<EntryResponse>> {
    let entry = entries::get(&state.db, identity.user_id, entry_id).await?;
    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<EntryResponse>)> {
    let entry = entries::create(&state.db, identity.user_id, body, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    let now = state.clock.now();
    let entry = entries::update(&state.db, identity.user_id, entry_id, body, now).await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    entries::delete(&state.db, identity.user_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
