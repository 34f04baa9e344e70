use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{parse_optional_id, validate_id};
use super::{ApiError, AppPath, AppQuery, AppState};
use crate::models::{Grade, Subject, Textbook};

/// Filters are kept as raw strings: invalid values are ignored rather than rejected.
#[derive(Debug, Deserialize)]
pub struct TextbookQuery {
    pub subject_id: Option<String>,
    pub grade_id: Option<String>,
}

pub async fn list_subjects(State(state): State<Arc<AppState>>) -> Json<Vec<Subject>> {
    Json(state.store().list_subjects().await)
}

pub async fn get_subject(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Subject>, ApiError> {
    let id = validate_id(id)?;
    state
        .store()
        .get_subject(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Subject"))
}

pub async fn list_grades(State(state): State<Arc<AppState>>) -> Json<Vec<Grade>> {
    Json(state.store().list_grades().await)
}

pub async fn list_textbooks(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<TextbookQuery>,
) -> Json<Vec<Textbook>> {
    let subject_id = parse_optional_id(query.subject_id.as_deref());
    let grade_id = parse_optional_id(query.grade_id.as_deref());

    Json(state.store().list_textbooks(subject_id, grade_id).await)
}

pub async fn get_textbook(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Textbook>, ApiError> {
    let id = validate_id(id)?;
    state
        .store()
        .get_textbook(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Textbook"))
}
