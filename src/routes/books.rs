//! Book Endpoints
//!
//! 카탈로그 CRUD. 날짜 필드는 `YYYY-MM-DD` 문자열로 입출력.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    db::Book,
    error::LibraryError,
    services::{BookPatch, CreateBook},
    types::MessageResponse,
    AppState,
};

use super::extract::{AppJson, AppPath};

/// GET /books
///
/// # Response
///
/// ```json
/// [{ "id": 1, "title": "Dune", "author": "Herbert", "published_at": "1965-08-01" }]
/// ```
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<Book>>, LibraryError> {
    Ok(Json(state.catalog.list_books().await?))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Book>, LibraryError> {
    Ok(Json(state.catalog.get_book(id).await?))
}

/// POST /books
///
/// 201 `{ "message": "Book added successfully", "id": 1 }`
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateBook>,
) -> Result<(StatusCode, Json<MessageResponse>), LibraryError> {
    let book = state.catalog.create_book(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created("Book added successfully", book.id)),
    ))
}

/// PUT /books/:id
pub async fn update_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<BookPatch>,
) -> Result<Json<MessageResponse>, LibraryError> {
    state.catalog.update_book(id, patch).await?;
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// DELETE /books/:id
///
/// 대출 중인 책은 409
pub async fn delete_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, LibraryError> {
    state.catalog.delete_book(id).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
