//! Circulation Endpoints
//!
//! 대출/반납 및 대출 기록 조회

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::BorrowRecord,
    error::LibraryError,
    services::BookState,
    AppState,
};

use super::extract::{AppJson, AppPath, AppQuery};

// ============ Request/Response Types ============

/// 대출/반납 요청
#[derive(Debug, Deserialize)]
pub struct CirculationRequest {
    pub student_id: Option<i64>,
}

/// 대출/반납 응답
#[derive(Debug, Serialize)]
pub struct CirculationResponse {
    pub message: String,
    pub record: BorrowRecord,
}

/// 학생 대출 목록 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct BorrowsQuery {
    /// true면 미반납만 (기본 false)
    pub active: Option<bool>,
}

// ============ Handlers ============

/// POST /books/:id/borrow
///
/// # Request
///
/// ```json
/// { "student_id": 7 }
/// ```
///
/// - 400: student_id 없음
/// - 404: 책 또는 학생 없음
/// - 409: 이미 대출 중
pub async fn borrow_book(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
    AppJson(req): AppJson<CirculationRequest>,
) -> Result<Json<CirculationResponse>, LibraryError> {
    let record = state.circulation.borrow(book_id, req.student_id).await?;

    Ok(Json(CirculationResponse {
        message: format!(
            "Student {} has borrowed book {} successfully.",
            record.student_id, book_id
        ),
        record,
    }))
}

/// POST /books/:id/return
///
/// - 400: student_id 없음
/// - 404: 일치하는 활성 대출 없음
pub async fn return_book(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
    AppJson(req): AppJson<CirculationRequest>,
) -> Result<Json<CirculationResponse>, LibraryError> {
    let record = state.circulation.return_book(book_id, req.student_id).await?;

    Ok(Json(CirculationResponse {
        message: format!(
            "Student {} has returned book {} successfully.",
            record.student_id, book_id
        ),
        record,
    }))
}

/// GET /books/:id/status
pub async fn book_status(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<BookState>, LibraryError> {
    Ok(Json(state.circulation.book_state(book_id).await?))
}

/// GET /books/:id/borrows
pub async fn book_history(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<Vec<BorrowRecord>>, LibraryError> {
    Ok(Json(state.circulation.book_history(book_id).await?))
}

/// GET /students/:id/borrows?active=true
pub async fn student_borrows(
    State(state): State<AppState>,
    AppPath(student_id): AppPath<i64>,
    AppQuery(query): AppQuery<BorrowsQuery>,
) -> Result<Json<Vec<BorrowRecord>>, LibraryError> {
    let active_only = query.active.unwrap_or(false);
    Ok(Json(state.circulation.student_borrows(student_id, active_only).await?))
}
