//! student_book 테이블 쿼리
//!
//! 활성 대출 = `return_date IS NULL`
//! 책당 활성 대출 1건은 부분 유니크 인덱스(idx_student_book_active)가 최종 보장
//! 쓰기는 모두 단일 문장 → 경합 시 busy_timeout 동안 대기 후 제약 검사

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use super::models::BorrowRecord;

/// 책의 활성 대출 조회 (대출자 무관)
pub async fn find_active_for_book<'e, E>(
    executor: E,
    book_id: i64,
) -> sqlx::Result<Option<BorrowRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        SELECT id, student_id, book_id, borrow_date, return_date
        FROM student_book
        WHERE book_id = ? AND return_date IS NULL
        "#
    )
    .bind(book_id)
    .fetch_optional(executor)
    .await
}

/// (book, student) 쌍의 활성 대출 조회
pub async fn find_active<'e, E>(
    executor: E,
    book_id: i64,
    student_id: i64,
) -> sqlx::Result<Option<BorrowRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        SELECT id, student_id, book_id, borrow_date, return_date
        FROM student_book
        WHERE book_id = ? AND student_id = ? AND return_date IS NULL
        "#
    )
    .bind(book_id)
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(
    executor: E,
    book_id: i64,
    student_id: i64,
    borrow_date: DateTime<Utc>,
) -> sqlx::Result<BorrowRecord>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        INSERT INTO student_book (student_id, book_id, borrow_date, return_date)
        VALUES (?, ?, ?, NULL)
        RETURNING id, student_id, book_id, borrow_date, return_date
        "#
    )
    .bind(student_id)
    .bind(book_id)
    .bind(borrow_date)
    .fetch_one(executor)
    .await
}

/// 반납 처리 (이미 반납된 기록은 건드리지 않음)
pub async fn mark_returned<'e, E>(
    executor: E,
    record_id: i64,
    return_date: DateTime<Utc>,
) -> sqlx::Result<Option<BorrowRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        UPDATE student_book
        SET return_date = ?
        WHERE id = ? AND return_date IS NULL
        RETURNING id, student_id, book_id, borrow_date, return_date
        "#
    )
    .bind(return_date)
    .bind(record_id)
    .fetch_optional(executor)
    .await
}

/// 책 대출 히스토리 (최신순)
pub async fn list_for_book<'e, E>(executor: E, book_id: i64) -> sqlx::Result<Vec<BorrowRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        SELECT id, student_id, book_id, borrow_date, return_date
        FROM student_book
        WHERE book_id = ?
        ORDER BY id DESC
        "#
    )
    .bind(book_id)
    .fetch_all(executor)
    .await
}

/// 학생 대출 기록 전체 (최신순)
pub async fn list_for_student<'e, E>(executor: E, student_id: i64) -> sqlx::Result<Vec<BorrowRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BorrowRecord>(
        r#"
        SELECT id, student_id, book_id, borrow_date, return_date
        FROM student_book
        WHERE student_id = ?
        ORDER BY id DESC
        "#
    )
    .bind(student_id)
    .fetch_all(executor)
    .await
}
