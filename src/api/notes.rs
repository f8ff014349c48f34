use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_note_id, validate_note_title};
use super::{ApiError, AppState, NoteDto};

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub text: Option<String>,
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NoteDto>>, ApiError> {
    let notes = state.note_service().list().await?;
    Ok(Json(notes.into_iter().map(NoteDto::from).collect()))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
) -> Result<Json<NoteDto>, ApiError> {
    let id = validate_note_id(&note_id)?;
    let note = state.note_service().get(id).await?;
    Ok(Json(NoteDto::from(note)))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteDto>), ApiError> {
    let Json(payload) = payload?;
    let title = validate_note_title(payload.title.as_deref())?;

    let note = state
        .note_service()
        .create(title, payload.text.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(NoteDto::from(note))))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<NoteDto>, ApiError> {
    let id = validate_note_id(&note_id)?;
    let Json(payload) = payload?;
    let title = validate_note_title(payload.title.as_deref())?;

    let note = state
        .note_service()
        .update(id, title, payload.text.as_deref())
        .await?;

    Ok(Json(NoteDto::from(note)))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = validate_note_id(&note_id)?;
    state.note_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
