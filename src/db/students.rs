//! student 테이블 쿼리

use sqlx::{Executor, Sqlite};

use super::models::{NewStudent, Student};

pub async fn list<'e, E>(executor: E) -> sqlx::Result<Vec<Student>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Student>(
        "SELECT id, first_name, last_name, email, birth_date FROM student ORDER BY id"
    )
    .fetch_all(executor)
    .await
}

pub async fn find<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<Student>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Student>(
        "SELECT id, first_name, last_name, email, birth_date FROM student WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// 이메일 중복 시 UNIQUE 제약 위반 → 호출 측에서 Conflict로 변환
pub async fn insert<'e, E>(executor: E, student: &NewStudent) -> sqlx::Result<Student>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO student (first_name, last_name, email, birth_date)
        VALUES (?, ?, ?, ?)
        RETURNING id, first_name, last_name, email, birth_date
        "#
    )
    .bind(&student.first_name)
    .bind(&student.last_name)
    .bind(&student.email)
    .bind(student.birth_date)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(executor: E, student: &Student) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE student
        SET first_name = ?, last_name = ?, email = ?, birth_date = ?
        WHERE id = ?
        "#
    )
    .bind(&student.first_name)
    .bind(&student.last_name)
    .bind(&student.email)
    .bind(student.birth_date)
    .bind(student.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// 미반납 대출이 없을 때만 삭제 (단일 문장)
pub async fn delete_if_no_active_borrows<'e, E>(executor: E, id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM student
        WHERE id = ?
          AND NOT EXISTS (
              SELECT 1 FROM student_book
              WHERE student_book.student_id = student.id AND return_date IS NULL
          )
        "#
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
