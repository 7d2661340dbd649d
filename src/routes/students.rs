//! Student Endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    db::Student,
    error::LibraryError,
    services::{CreateStudent, StudentPatch},
    types::MessageResponse,
    AppState,
};

use super::extract::{AppJson, AppPath};

/// GET /students
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, LibraryError> {
    Ok(Json(state.students.list_students().await?))
}

/// GET /students/:id
pub async fn get_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Student>, LibraryError> {
    Ok(Json(state.students.get_student(id).await?))
}

/// POST /students
///
/// 이메일 중복 시 409
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateStudent>,
) -> Result<(StatusCode, Json<MessageResponse>), LibraryError> {
    let student = state.students.create_student(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created("Student added successfully", student.id)),
    ))
}

/// PUT /students/:id
pub async fn update_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<StudentPatch>,
) -> Result<Json<MessageResponse>, LibraryError> {
    state.students.update_student(id, patch).await?;
    Ok(Json(MessageResponse::new("Student updated successfully")))
}

/// DELETE /students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, LibraryError> {
    state.students.delete_student(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
