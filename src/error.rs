//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 도서관 도메인 에러 타입
///
/// # Design Decision
///
/// 카탈로그/대출 로직은 HTTP를 모름 → 이 enum만 반환
/// 라우트 경계에서 `IntoResponse`로 상태 코드에 매핑
/// - InvalidInput: 400
/// - NotFound: 404
/// - Conflict: 409 (이중 대출, 중복 이메일, 대출 중 삭제)
/// - Database: 500
///
/// 민감한 내부 정보는 클라이언트에 노출하지 않음
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    // ============ 400 Bad Request ============
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ============ 404 Not Found ============
    #[error("{0} not found")]
    NotFound(String),

    // ============ 409 Conflict ============
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ 500 Internal Server Error ============
    #[error("Database error: {0}")]
    Database(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

impl LibraryError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API 에러 응답 구조
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            LibraryError::InvalidInput(msg) => ("INVALID_INPUT", msg.clone()),
            LibraryError::NotFound(resource) => ("NOT_FOUND", format!("{} not found", resource)),
            LibraryError::Conflict(msg) => ("CONFLICT", msg.clone()),
            LibraryError::Database(_) => {
                // 내부 에러는 클라이언트에 상세 정보 노출 안 함
                tracing::error!("Database error: {:?}", self);
                ("DATABASE_ERROR", "Database error occurred".to_string())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// SQLx 에러를 LibraryError로 변환
///
/// 유니크 제약 위반은 동시 요청 경합의 결과 → Conflict
/// (활성 대출 부분 인덱스, student.email)
impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                tracing::warn!("Unique constraint violated: {}", db_err.message());
                return LibraryError::Conflict(unique_violation_message(db_err.message()));
            }
        }
        tracing::error!("SQLx error: {:?}", err);
        LibraryError::Database(err.to_string())
    }
}

/// 추출기 rejection → 400 InvalidInput
///
/// axum 기본값(422/415 text/plain) 대신 다른 도메인 에러와 같은 JSON 형태로 응답
impl From<JsonRejection> for LibraryError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("JSON body rejected: {}", rejection.body_text());
        LibraryError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for LibraryError {
    fn from(rejection: PathRejection) -> Self {
        LibraryError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for LibraryError {
    fn from(rejection: QueryRejection) -> Self {
        LibraryError::InvalidInput(rejection.body_text())
    }
}

fn unique_violation_message(detail: &str) -> String {
    if detail.contains("student.email") {
        "Email is already registered".to_string()
    } else if detail.contains("student_book") {
        "Book is already borrowed".to_string()
    } else {
        "Duplicate record".to_string()
    }
}
