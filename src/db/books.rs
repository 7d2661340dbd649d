//! book 테이블 쿼리
//!
//! 모든 함수는 executor 제네릭 (풀 또는 단일 커넥션)

use sqlx::{Executor, Sqlite};

use super::models::{Book, NewBook};

pub async fn list<'e, E>(executor: E) -> sqlx::Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Book>(
        "SELECT id, title, author, published_at FROM book ORDER BY id"
    )
    .fetch_all(executor)
    .await
}

pub async fn find<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Book>(
        "SELECT id, title, author, published_at FROM book WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, book: &NewBook) -> sqlx::Result<Book>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO book (title, author, published_at)
        VALUES (?, ?, ?)
        RETURNING id, title, author, published_at
        "#
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.published_at)
    .fetch_one(executor)
    .await
}

/// 전체 행 덮어쓰기 (부분 업데이트 병합은 서비스 레이어에서)
///
/// 0이면 그 사이 삭제된 것
pub async fn update<'e, E>(executor: E, book: &Book) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE book SET title = ?, author = ?, published_at = ? WHERE id = ?"
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.published_at)
    .bind(book.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// 활성 대출이 없을 때만 삭제 (단일 문장 → 조회와 삭제 사이 경합 없음)
///
/// 0이면 책이 없거나 대출 중 → 호출 측에서 구분
pub async fn delete_if_not_borrowed<'e, E>(executor: E, id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM book
        WHERE id = ?
          AND NOT EXISTS (
              SELECT 1 FROM student_book
              WHERE student_book.book_id = book.id AND return_date IS NULL
          )
        "#
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
