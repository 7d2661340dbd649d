//! Library Circulation API
//!
//! # Overview
//!
//! 도서관 기록 관리 백엔드: 도서, 학생, 대출/반납 이벤트를 REST API로 제공.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌──────────────────────────┐  ┌────────┐  │
//! │  │ Routes  │─▶│ Services                 │─▶│   DB   │  │
//! │  │ (axum)  │  │ Catalog / Students /     │  │(SQLite)│  │
//! │  └─────────┘  │ Circulation              │  └────────┘  │
//! │               └──────────────────────────┘              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 도메인 에러 타입 및 HTTP 매핑
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (카탈로그, 학생, 대출 상태 전이)
//! - `db`: 스키마 모델과 쿼리
//! - `types`: 공통 타입 (날짜 파싱, 부분 업데이트)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use library_api::{config::Config, db::Database, AppState, routes};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url, config.max_connections).await?;
//!     db.run_migrations().await?;
//!
//!     let app = routes::create_router(AppState::new(db, config));
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod db;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{LibraryError, LibraryResult};
pub use db::Database;
pub use services::{CatalogManager, CirculationManager, StudentRegistry};

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub catalog: Arc<CatalogManager>,
    pub students: Arc<StudentRegistry>,
    pub circulation: Arc<CirculationManager>,
    pub config: Arc<Config>,
}

impl AppState {
    /// 서비스들은 같은 커넥션 풀을 공유
    pub fn new(db: Database, config: Config) -> Self {
        let db = Arc::new(db);
        Self {
            catalog: Arc::new(CatalogManager::new(db.clone())),
            students: Arc::new(StudentRegistry::new(db.clone())),
            circulation: Arc::new(CirculationManager::new(db.clone())),
            db,
            config: Arc::new(config),
        }
    }
}
