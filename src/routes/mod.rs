//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의 (Request Adapter)
//! 핸들러는 JSON ↔ 서비스 호출 변환만 담당, 로직은 services에 있음
//!
//! # Routes
//!
//! ```text
//! GET    /health                       - 서버 상태 확인
//!
//! GET    /books                        - 도서 목록
//! POST   /books                        - 도서 등록 (201)
//! GET    /books/:id                    - 도서 조회
//! PUT    /books/:id                    - 도서 부분 수정
//! DELETE /books/:id                    - 도서 삭제
//! GET    /books/:id/status             - 대출 상태
//! GET    /books/:id/borrows            - 대출 히스토리
//! POST   /books/:id/borrow             - 대출
//! POST   /books/:id/return             - 반납
//!
//! GET    /students                     - 학생 목록
//! POST   /students                     - 학생 등록 (201)
//! GET    /students/:id                 - 학생 조회
//! PUT    /students/:id                 - 학생 부분 수정
//! DELETE /students/:id                 - 학생 삭제
//! GET    /students/:id/borrows         - 학생 대출 목록 (?active=true)
//! ```

pub mod health;
pub mod books;
pub mod students;
pub mod circulation;
pub mod extract;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// 라우터 생성
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Catalog
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )

        // Circulation
        .route("/books/:id/status", get(circulation::book_status))
        .route("/books/:id/borrows", get(circulation::book_history))
        .route("/books/:id/borrow", post(circulation::borrow_book))
        .route("/books/:id/return", post(circulation::return_book))

        // Students
        .route("/students", get(students::list_students).post(students::create_student))
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/:id/borrows", get(circulation::student_borrows))

        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}

/// CORS 설정
///
/// 프로덕션: `ALLOWED_ORIGINS`(콤마 구분)만 허용
/// 개발: 모든 origin 허용
fn cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    if state.config.is_production() {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
