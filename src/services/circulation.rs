//! Circulation Manager
//!
//! # State Machine (per Book)
//!
//! ```text
//!              borrow(book, student)
//!   AVAILABLE ───────────────────────▶ BORROWED
//!       ▲                                  │
//!       └──────────────────────────────────┘
//!              return(book, student)
//! ```
//!
//! - 초기 상태: AVAILABLE (활성 기록 없음)
//! - BORROWED = `return_date IS NULL`인 student_book 행이 존재
//! - 반납은 행을 지우지 않고 `return_date`를 기록 → 히스토리 보존
//!
//! # Concurrency
//!
//! 사전 조회는 에러 메시지용, 불변식은 쓰기 문장이 보장:
//! - 대출: 단일 INSERT → 부분 유니크 인덱스가 두 번째 활성 기록을 거부 (Conflict)
//! - 반납: `UPDATE ... WHERE return_date IS NULL` → 경합에서 진 쪽은 NotFound
//!
//! 읽기 후 쓰기 승격이 일어나는 트랜잭션은 쓰지 않음 (SQLITE_BUSY 회피)

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::db::{books, borrows, students, BorrowRecord, Database};
use crate::error::{LibraryError, LibraryResult};

/// 도서 대출 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookState {
    Available,
    Borrowed { record: BorrowRecord },
}

/// `student_id`는 필수이며 양수여야 함
fn require_student_id(student_id: Option<i64>) -> LibraryResult<i64> {
    match student_id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(LibraryError::invalid("student_id is required")),
    }
}

pub struct CirculationManager {
    db: Arc<Database>,
}

impl CirculationManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// 대출 (AVAILABLE → BORROWED)
    ///
    /// # Errors
    ///
    /// - InvalidInput: student_id 없음
    /// - NotFound: 책 또는 학생 없음
    /// - Conflict: 이미 활성 대출 존재 (대출자 무관)
    pub async fn borrow(&self, book_id: i64, student_id: Option<i64>) -> LibraryResult<BorrowRecord> {
        let student_id = require_student_id(student_id)?;
        let pool = self.db.pool();

        let book = books::find(pool, book_id).await?;
        let student = students::find(pool, student_id).await?;
        if book.is_none() || student.is_none() {
            return Err(LibraryError::not_found("Book or Student"));
        }

        if let Some(active) = borrows::find_active_for_book(pool, book_id).await? {
            tracing::warn!(
                book_id,
                student_id,
                holder = active.student_id,
                "Rejected borrow of already borrowed book"
            );
            return Err(LibraryError::conflict("Book is already borrowed"));
        }

        // 조회 이후 경합: 유니크 위반 → Conflict, 그 사이 삭제 → NotFound
        let record = borrows::insert(pool, book_id, student_id, Utc::now())
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    LibraryError::not_found("Book or Student")
                }
                _ => LibraryError::from(err),
            })?;

        tracing::info!(book_id, student_id, record_id = record.id, "Book borrowed");
        Ok(record)
    }

    /// 반납 (BORROWED → AVAILABLE)
    ///
    /// (book_id, student_id) 쌍과 정확히 일치하는 활성 기록만 반납 가능
    pub async fn return_book(&self, book_id: i64, student_id: Option<i64>) -> LibraryResult<BorrowRecord> {
        let student_id = require_student_id(student_id)?;
        let pool = self.db.pool();

        let active = borrows::find_active(pool, book_id, student_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Borrow record"))?;

        // 동시 반납 시 한쪽만 갱신됨
        let record = borrows::mark_returned(pool, active.id, Utc::now())
            .await?
            .ok_or_else(|| LibraryError::not_found("Borrow record"))?;

        tracing::info!(book_id, student_id, record_id = record.id, "Book returned");
        Ok(record)
    }

    /// 현재 대출 상태 조회
    pub async fn book_state(&self, book_id: i64) -> LibraryResult<BookState> {
        if books::find(self.db.pool(), book_id).await?.is_none() {
            return Err(LibraryError::not_found("Book"));
        }

        Ok(match borrows::find_active_for_book(self.db.pool(), book_id).await? {
            Some(record) if record.is_active() => BookState::Borrowed { record },
            _ => BookState::Available,
        })
    }

    /// 도서 대출 히스토리 (최신순)
    pub async fn book_history(&self, book_id: i64) -> LibraryResult<Vec<BorrowRecord>> {
        if books::find(self.db.pool(), book_id).await?.is_none() {
            return Err(LibraryError::not_found("Book"));
        }
        Ok(borrows::list_for_book(self.db.pool(), book_id).await?)
    }

    /// 학생 대출 목록, `active_only`면 미반납만
    pub async fn student_borrows(
        &self,
        student_id: i64,
        active_only: bool,
    ) -> LibraryResult<Vec<BorrowRecord>> {
        if students::find(self.db.pool(), student_id).await?.is_none() {
            return Err(LibraryError::not_found("Student"));
        }
        let records = borrows::list_for_student(self.db.pool(), student_id).await?;
        Ok(records
            .into_iter()
            .filter(|record| !active_only || record.is_active())
            .collect())
    }
}
