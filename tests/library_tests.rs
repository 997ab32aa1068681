//! Inventory engine tests against the in-memory store.
//!
//! Covers the copy-count invariants, cache coherence around mutations, and
//! the per-ISBN concurrency contract.

use std::sync::Arc;

use biblos_server::{
    error::AppError,
    models::Book,
    repository::{memory::MemoryBookRepository, BookRepository},
    services::library::LibraryService,
};

fn setup() -> (Arc<MemoryBookRepository>, LibraryService) {
    let repository = Arc::new(MemoryBookRepository::new());
    let service = LibraryService::new(repository.clone());
    (repository, service)
}

async fn create(service: &LibraryService, isbn: &str, author: &str, copies: i32) -> Book {
    service
        .create_book(Book::new(isbn, format!("Title {isbn}"), author, 2000, copies))
        .await
        .expect("create failed")
}

#[tokio::test]
async fn find_after_create_returns_full_availability() {
    let (_, service) = setup();
    create(&service, "978-1", "Herbert", 3).await;

    let found = service.find_book_by_isbn("978-1").await.unwrap();
    assert_eq!(found.available_copies, found.total_copies);
    assert_eq!(found.available_copies, 3);
    assert!(found.id.is_some());
}

#[tokio::test]
async fn duplicate_isbn_fails_and_first_record_wins() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 2).await;

    let err = service
        .create_book(Book::new("978-1", "Impostor", "Someone", 2020, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));

    let kept = repository.find_by_isbn("978-1").await.unwrap().unwrap();
    assert_eq!(kept.author, "Herbert");
    assert_eq!(kept.total_copies, 2);
}

#[tokio::test]
async fn borrow_decrement_is_visible_in_store_and_cache() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 2).await;

    let borrowed = service.borrow_book("978-1").await.unwrap();
    assert_eq!(borrowed.available_copies, 1);

    // Direct store query sees the decrement
    let stored = repository.find_by_isbn("978-1").await.unwrap().unwrap();
    assert_eq!(stored.available_copies, 1);

    // And so does a lookup, which is served from the refreshed cache
    let cached = service.find_book_by_isbn("978-1").await.unwrap();
    assert_eq!(cached.available_copies, 1);
}

#[tokio::test]
async fn borrow_without_copies_fails_and_state_is_unchanged() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 0).await;

    let err = service.borrow_book("978-1").await.unwrap_err();
    assert!(matches!(err, AppError::NoCopiesAvailable(_)));

    let stored = repository.find_by_isbn("978-1").await.unwrap().unwrap();
    assert_eq!(stored.available_copies, 0);
}

#[tokio::test]
async fn return_at_capacity_fails_and_state_is_unchanged() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 2).await;

    let err = service.return_book("978-1").await.unwrap_err();
    assert!(matches!(err, AppError::AtCapacity(_)));

    let stored = repository.find_by_isbn("978-1").await.unwrap().unwrap();
    assert_eq!(stored.available_copies, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_borrows_never_oversell() {
    const TOTAL_COPIES: i32 = 3;
    const ATTEMPTS: usize = 16;

    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", TOTAL_COPIES).await;

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for _ in 0..ATTEMPTS {
        let service = service.clone();
        handles.push(tokio::spawn(
            async move { service.borrow_book("978-1").await },
        ));
    }

    let mut successes = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(book) => {
                successes += 1;
                assert!(book.available_copies >= 0);
                assert!(book.available_copies < TOTAL_COPIES);
            }
            Err(AppError::NoCopiesAvailable(_)) => exhausted += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, TOTAL_COPIES as usize);
    assert_eq!(exhausted, ATTEMPTS - TOTAL_COPIES as usize);

    let stored = repository.find_by_isbn("978-1").await.unwrap().unwrap();
    assert_eq!(stored.available_copies, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_borrows_on_different_isbns_are_independent() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 4).await;
    create(&service, "978-2", "Gibson", 4).await;

    let mut handles = Vec::new();
    for isbn in ["978-1", "978-2"] {
        for _ in 0..4 {
            let service = service.clone();
            let isbn = isbn.to_string();
            handles.push(tokio::spawn(async move { service.borrow_book(&isbn).await }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for isbn in ["978-1", "978-2"] {
        let stored = repository.find_by_isbn(isbn).await.unwrap().unwrap();
        assert_eq!(stored.available_copies, 0);
    }
}

#[tokio::test]
async fn remove_deletes_record_and_evicts_cache() {
    let (repository, service) = setup();
    create(&service, "978-1", "Herbert", 2).await;

    // Warm the cache first so a stale entry would be observable
    service.find_book_by_isbn("978-1").await.unwrap();

    service.remove_book("978-1").await.unwrap();

    let err = service.find_book_by_isbn("978-1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(repository.find_by_isbn("978-1").await.unwrap().is_none());
}

#[tokio::test]
async fn remove_unknown_isbn_fails_not_found() {
    let (_, service) = setup();
    let err = service.remove_book("missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn author_query_returns_all_and_only_matches() {
    let (_, service) = setup();
    create(&service, "978-1", "Herbert", 1).await;
    create(&service, "978-2", "Gibson", 1).await;
    create(&service, "978-3", "Herbert", 1).await;

    let books = service.find_books_by_author("Herbert").await.unwrap();
    let isbns: Vec<&str> = books.iter().map(|b| b.isbn.as_str()).collect();
    assert_eq!(isbns, vec!["978-1", "978-3"]);
}

#[tokio::test]
async fn author_query_with_no_matches_fails_not_found() {
    let (_, service) = setup();
    create(&service, "978-1", "Herbert", 1).await;

    let err = service.find_books_by_author("Asimov").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn dune_borrow_and_return_scenario() {
    let (_, service) = setup();
    service
        .create_book(Book::new("978-1", "Dune", "Herbert", 1965, 2))
        .await
        .unwrap();

    assert_eq!(service.borrow_book("978-1").await.unwrap().available_copies, 1);
    assert_eq!(service.borrow_book("978-1").await.unwrap().available_copies, 0);
    assert!(matches!(
        service.borrow_book("978-1").await.unwrap_err(),
        AppError::NoCopiesAvailable(_)
    ));

    assert_eq!(service.return_book("978-1").await.unwrap().available_copies, 1);
    assert_eq!(service.return_book("978-1").await.unwrap().available_copies, 2);
    assert!(matches!(
        service.return_book("978-1").await.unwrap_err(),
        AppError::AtCapacity(_)
    ));
}
