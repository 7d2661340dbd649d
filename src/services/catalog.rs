//! Catalog Manager
//!
//! 도서 메타데이터 CRUD. 대출 상태와 독립적이지만 삭제만은 예외:
//! 활성 대출이 있는 책은 삭제 불가 (Conflict), 반납 완료 기록은 함께 삭제됨.

use std::sync::Arc;

use serde::Deserialize;

use crate::db::{books, borrows, Book, Database, NewBook};
use crate::error::{LibraryError, LibraryResult};
use crate::types::{parse_date, parse_optional_date, require_text, Patch};

/// 도서 생성 요청
#[derive(Debug, Default, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    /// `YYYY-MM-DD`
    pub published_at: Option<String>,
}

/// 도서 부분 업데이트 요청 (있는 필드만 반영)
#[derive(Debug, Default, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    /// `null`이면 출간일 제거
    #[serde(default)]
    pub published_at: Patch<String>,
}

impl BookPatch {
    fn is_empty(&self) -> bool {
        self.title.is_absent() && self.author.is_absent() && self.published_at.is_absent()
    }
}

pub struct CatalogManager {
    db: Arc<Database>,
}

impl CatalogManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// 전체 도서 (id 순)
    pub async fn list_books(&self) -> LibraryResult<Vec<Book>> {
        let books = books::list(self.db.pool()).await?;
        tracing::debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    pub async fn get_book(&self, id: i64) -> LibraryResult<Book> {
        books::find(self.db.pool(), id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Book"))
    }

    /// 도서 등록
    ///
    /// # Validation
    ///
    /// - title, author: 필수, 공백 불가
    /// - published_at: 있으면 `YYYY-MM-DD` 형식
    pub async fn create_book(&self, input: CreateBook) -> LibraryResult<Book> {
        let (title, author) = match (input.title, input.author) {
            (Some(title), Some(author)) => (
                require_text("title", Some(title))?,
                require_text("author", Some(author))?,
            ),
            _ => return Err(LibraryError::invalid("Invalid data, title and author are required")),
        };
        let published_at = parse_optional_date(input.published_at.as_deref())?;

        let book = books::insert(self.db.pool(), &NewBook { title, author, published_at }).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// 부분 업데이트
    ///
    /// 조회 → 병합 → 전체 행 저장. 저장은 단일 UPDATE 문장
    pub async fn update_book(&self, id: i64, patch: BookPatch) -> LibraryResult<Book> {
        let mut book = self.get_book(id).await?;

        if patch.is_empty() {
            return Err(LibraryError::invalid("No data provided"));
        }

        match patch.title {
            Patch::Absent => {}
            Patch::Null => return Err(LibraryError::invalid("title is required")),
            Patch::Value(title) => book.title = require_text("title", Some(title))?,
        }
        match patch.author {
            Patch::Absent => {}
            Patch::Null => return Err(LibraryError::invalid("author is required")),
            Patch::Value(author) => book.author = require_text("author", Some(author))?,
        }
        match patch.published_at {
            Patch::Absent => {}
            Patch::Null => book.published_at = None,
            Patch::Value(date) => book.published_at = Some(parse_date(&date)?),
        }

        if books::update(self.db.pool(), &book).await? == 0 {
            return Err(LibraryError::not_found("Book"));
        }

        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }

    /// 도서 삭제
    ///
    /// 활성 대출 중이면 Conflict, 반납 완료 기록은 CASCADE로 함께 삭제
    pub async fn delete_book(&self, id: i64) -> LibraryResult<()> {
        if books::delete_if_not_borrowed(self.db.pool(), id).await? > 0 {
            tracing::info!(book_id = id, "Book deleted");
            return Ok(());
        }

        // 삭제되지 않은 이유 구분
        self.get_book(id).await?;
        let holder = borrows::find_active_for_book(self.db.pool(), id)
            .await?
            .map(|record| record.student_id);
        tracing::warn!(book_id = id, ?holder, "Rejected delete of borrowed book");
        Err(LibraryError::conflict("Book is currently borrowed and cannot be deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::migrated_db;
    use crate::types::DATE_FORMAT;
    use tokio_test::assert_ok;

    fn dune() -> CreateBook {
        CreateBook {
            title: Some("Dune".into()),
            author: Some("Herbert".into()),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_book() {
        let catalog = CatalogManager::new(migrated_db().await);

        let created = assert_ok!(catalog.create_book(dune()).await);
        let loaded = assert_ok!(catalog.get_book(created.id).await);

        assert_eq!(loaded.title, "Dune");
        assert_eq!(loaded.author, "Herbert");
        assert_eq!(loaded.published_at, None);
    }

    #[tokio::test]
    async fn test_create_book_requires_title_and_author() {
        let catalog = CatalogManager::new(migrated_db().await);

        let empty_title = CreateBook { title: Some("".into()), ..dune() };
        assert!(matches!(
            catalog.create_book(empty_title).await,
            Err(LibraryError::InvalidInput(_))
        ));

        let missing_author = CreateBook { author: None, ..dune() };
        assert!(matches!(
            catalog.create_book(missing_author).await,
            Err(LibraryError::InvalidInput(_))
        ));

        assert!(catalog.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_published_at_validation() {
        let catalog = CatalogManager::new(migrated_db().await);

        let bad = CreateBook { published_at: Some("2023-13-40".into()), ..dune() };
        assert!(matches!(catalog.create_book(bad).await, Err(LibraryError::InvalidInput(_))));

        let good = CreateBook { published_at: Some("2023-01-15".into()), ..dune() };
        let book = assert_ok!(catalog.create_book(good).await);
        let loaded = catalog.get_book(book.id).await.unwrap();
        assert_eq!(
            loaded.published_at.unwrap().format(DATE_FORMAT).to_string(),
            "2023-01-15"
        );
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let catalog = CatalogManager::new(migrated_db().await);
        let book = catalog.create_book(dune()).await.unwrap();

        let patch = BookPatch {
            title: Patch::Value("Dune Messiah".into()),
            published_at: Patch::Value("1969-10-15".into()),
            ..Default::default()
        };
        let updated = assert_ok!(catalog.update_book(book.id, patch).await);

        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, "Herbert");
        assert_eq!(catalog.get_book(book.id).await.unwrap(), updated);

        let clear = BookPatch { published_at: Patch::Null, ..Default::default() };
        let cleared = catalog.update_book(book.id, clear).await.unwrap();
        assert_eq!(cleared.published_at, None);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let catalog = CatalogManager::new(migrated_db().await);
        let book = catalog.create_book(dune()).await.unwrap();

        let bad_date = BookPatch { published_at: Patch::Value("2023-13-40".into()), ..Default::default() };
        assert!(matches!(
            catalog.update_book(book.id, bad_date).await,
            Err(LibraryError::InvalidInput(_))
        ));

        assert!(matches!(
            catalog.update_book(book.id, BookPatch::default()).await,
            Err(LibraryError::InvalidInput(_))
        ));

        let patch = BookPatch { title: Patch::Value("x".into()), ..Default::default() };
        assert_eq!(
            catalog.update_book(999, patch).await,
            Err(LibraryError::not_found("Book"))
        );

        // 실패한 업데이트는 아무것도 바꾸지 않음
        assert_eq!(catalog.get_book(book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn test_delete_book() {
        let catalog = CatalogManager::new(migrated_db().await);
        let book = catalog.create_book(dune()).await.unwrap();

        assert_ok!(catalog.delete_book(book.id).await);
        assert_eq!(catalog.get_book(book.id).await, Err(LibraryError::not_found("Book")));
        assert_eq!(catalog.delete_book(book.id).await, Err(LibraryError::not_found("Book")));
    }
}
