//! Database Models
//!
//! 세 개의 테이블(book, student, student_book)과 1:1로 대응하는 행 타입.
//! 날짜는 `YYYY-MM-DD` 텍스트, 타임스탬프는 RFC3339 텍스트로 저장됨.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// 도서 (단일 유통 단위, 복본 없음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// 출간일 (옵션)
    pub published_at: Option<NaiveDate>,
}

/// 학생
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// 전역 유니크 (스토어 제약)
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}

/// 대출 기록 (student_book 조인 엔티티)
///
/// 반납 시 삭제하지 않고 `return_date`만 채움 → 히스토리 유지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BorrowRecord {
    pub id: i64,
    pub student_id: i64,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    /// None = 활성 대출
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// 신규 도서 입력 (검증 완료 상태)
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_at: Option<NaiveDate>,
}

/// 신규 학생 입력 (검증 완료 상태)
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}
