//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 SQLite를 선택했는가?
//! A: 단일 프로세스 도서관 서비스에 적합
//!
//!    1. 파일 하나로 배포, 별도 서버 불필요
//!    2. 외래 키 + ON DELETE CASCADE 지원
//!    3. 부분 인덱스(`WHERE return_date IS NULL`) 지원 → 활성 대출 유니크 보장
//!    4. 테스트 시 `sqlite::memory:`로 격리된 DB 생성
//!
//! Q: "책 한 권당 활성 대출 1건" 불변식은 어떻게 지키는가?
//! A: 두 겹으로 보장
//!
//!    - 서비스 레이어: 사전 조회 (명확한 에러 메시지)
//!    - 스토어: 부분 유니크 인덱스 → 동시 요청이 조회를 통과해도 삽입 실패
//!      (유니크 위반은 `LibraryError::Conflict`로 변환)
//!
//! Q: 왜 조회 후 쓰기를 트랜잭션으로 묶지 않는가?
//! A: SQLite DEFERRED 트랜잭션은 읽기 후 쓰기 승격 시 busy handler 없이
//!    즉시 SQLITE_BUSY를 반환함 → 경합에서 진 요청이 500이 됨
//!
//!    - 쓰기는 모두 조건이 포함된 단일 문장 (`INSERT`, `UPDATE ... WHERE return_date IS NULL`,
//!      `DELETE ... WHERE NOT EXISTS (...)`)
//!    - 단일 문장은 락 획득 시 busy_timeout 동안 대기 → 제약 검사로 결과 결정
//!    - WAL 모드: 읽기가 쓰기를 막지 않음
//!
//! Q: 쿼리 함수가 `&self`가 아닌 executor 제네릭인 이유는?
//! A: 풀과 단일 커넥션 양쪽에서 재사용
//!
//!    ```rust,ignore
//!    books::find(db.pool(), id).await?;
//!    ```

mod models;
pub mod books;
pub mod students;
pub mod borrows;

pub use models::*;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 설정값 (SQLite는 writer 1개이므로 작게 유지)
    /// - foreign_keys: 모든 커넥션에서 활성화
    /// - create_if_missing: 파일 없으면 생성
    /// - journal_mode: WAL
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// 인메모리 데이터베이스 (테스트용)
    ///
    /// `sqlite::memory:`는 커넥션마다 별도 DB → 커넥션 1개로 고정하고 만료시키지 않음
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
