//! 동시 대출/반납 경합 테스트 (파일 기반 DB, 다중 커넥션 풀)

use std::sync::Arc;

use library_api::{
    services::{CreateBook, CreateStudent},
    CatalogManager, CirculationManager, Database, LibraryError, StudentRegistry,
};
use tempfile::TempDir;

const CONTENDERS: usize = 8;
const ROUNDS: usize = 10;

struct Library {
    _dir: TempDir,
    catalog: CatalogManager,
    registry: StudentRegistry,
    circulation: Arc<CirculationManager>,
}

async fn file_backed_library() -> Library {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("library.db").display());

    let db = Database::connect(&url, CONTENDERS as u32).await.unwrap();
    db.run_migrations().await.unwrap();
    let db = Arc::new(db);

    Library {
        _dir: dir,
        catalog: CatalogManager::new(db.clone()),
        registry: StudentRegistry::new(db.clone()),
        circulation: Arc::new(CirculationManager::new(db)),
    }
}

async fn register_students(library: &Library) -> Vec<i64> {
    let mut ids = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        let student = library
            .registry
            .create_student(CreateStudent {
                first_name: Some(format!("Reader{i}")),
                last_name: Some("Racer".into()),
                email: Some(format!("reader{i}@school.edu")),
                birth_date: None,
            })
            .await
            .unwrap();
        ids.push(student.id);
    }
    ids
}

async fn create_book(library: &Library, title: String) -> i64 {
    library
        .catalog
        .create_book(CreateBook {
            title: Some(title),
            author: Some("Herbert".into()),
            published_at: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_borrows_yield_one_winner_and_conflicts() {
    let library = file_backed_library().await;
    let students = register_students(&library).await;

    for round in 0..ROUNDS {
        let book = create_book(&library, format!("Dune vol. {round}")).await;

        let handles: Vec<_> = students
            .iter()
            .map(|&student| {
                let circulation = library.circulation.clone();
                tokio::spawn(async move { circulation.borrow(book, Some(student)).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(record) => {
                    assert_eq!(record.book_id, book);
                    winners += 1;
                }
                Err(LibraryError::Conflict(_)) => {}
                Err(other) => panic!("round {round}: unexpected error {other:?}"),
            }
        }
        assert_eq!(winners, 1, "round {round}: exactly one borrow must succeed");

        let history = library.circulation.book_history(book).await.unwrap();
        assert_eq!(history.iter().filter(|r| r.is_active()).count(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_returns_close_the_loan_once() {
    let library = file_backed_library().await;
    let students = register_students(&library).await;
    let holder = students[0];
    let book = create_book(&library, "Dune".into()).await;

    library.circulation.borrow(book, Some(holder)).await.unwrap();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let circulation = library.circulation.clone();
            tokio::spawn(async move { circulation.return_book(book, Some(holder)).await })
        })
        .collect();

    let mut returned = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(record) => {
                assert!(record.return_date.is_some());
                returned += 1;
            }
            Err(LibraryError::NotFound(_)) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(returned, 1);

    // 반납 후에는 다른 학생이 대출 가능
    assert!(library.circulation.borrow(book, Some(students[1])).await.is_ok());
}
