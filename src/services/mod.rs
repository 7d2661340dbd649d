//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어 (HTTP 무관)
//!
//! # Services
//! - `CatalogManager`: 도서 CRUD
//! - `StudentRegistry`: 학생 CRUD
//! - `CirculationManager`: 대출/반납 상태 전이

mod catalog;
mod students;
mod circulation;

pub use catalog::{BookPatch, CatalogManager, CreateBook};
pub use students::{CreateStudent, StudentPatch, StudentRegistry};
pub use circulation::{BookState, CirculationManager};
