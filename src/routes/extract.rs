//! 요청 추출기 래퍼
//!
//! axum 기본 추출기의 rejection은 text/plain 422/400으로 응답함
//! → `LibraryError::InvalidInput`으로 변환해 `{error, code}` JSON 400으로 통일

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::LibraryError;

/// JSON 바디 (`axum::Json` 위임)
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(LibraryError))]
pub struct AppJson<T>(pub T);

/// 경로 파라미터 (`axum::extract::Path` 위임)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(LibraryError))]
pub struct AppPath<T>(pub T);

/// 쿼리 스트링 (`axum::extract::Query` 위임)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(LibraryError))]
pub struct AppQuery<T>(pub T);
