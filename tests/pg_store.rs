//! PostgreSQL store tests
//!
//! Need a disposable database in DATABASE_URL.
//! Run with: cargo test --test pg_store -- --ignored

use std::sync::Arc;

use chrono::Utc;
use libris_server::{
    error::AppError,
    models::{BookInput, BorrowRecord},
    repository::{LibraryStore, PgStore},
    services::policy::{BorrowLimitPolicy, QuantityDelta},
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(12)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    PgStore::new(pool)
}

/// Each test works on its own borrower so runs do not interfere
fn unique_email() -> String {
    format!("{}@test.libris", Uuid::new_v4())
}

fn input(title: &str, category: &str, quantity: i32) -> BookInput {
    BookInput {
        title: title.to_string(),
        category: category.to_string(),
        quantity,
        author: None,
        image: None,
        description: None,
        rating: None,
    }
}

fn record(book_id: Uuid, email: &str) -> BorrowRecord {
    BorrowRecord {
        id: Uuid::new_v4(),
        book_id,
        borrower_email: email.to_string(),
        borrower_name: None,
        borrowed_at: Utc::now(),
        return_date: None,
    }
}

#[tokio::test]
#[ignore]
async fn test_fourth_borrow_rejected() {
    let store = store().await;
    let policy = BorrowLimitPolicy::default();
    let email = unique_email();

    for _ in 0..3 {
        store.insert_borrow(record(Uuid::new_v4(), &email), &policy).await.unwrap();
    }

    let err = store
        .insert_borrow(record(Uuid::new_v4(), &email), &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BorrowLimitExceeded { limit: 3, .. }));
    assert_eq!(store.list_borrows(&email).await.unwrap().len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_respect_limit() {
    let store = Arc::new(store().await);
    let policy = BorrowLimitPolicy::default();
    let email = unique_email();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            let email = email.clone();
            tokio::spawn(async move {
                store.insert_borrow(record(Uuid::new_v4(), &email), &policy).await.is_ok()
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 3);
    assert_eq!(store.list_borrows(&email).await.unwrap().len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_checkout_of_unknown_book_rolls_back() {
    let store = store().await;
    let policy = BorrowLimitPolicy::default();
    let email = unique_email();

    let err = store
        .checkout(record(Uuid::new_v4(), &email), &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(store.list_borrows(&email).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_rejected_checkout_changes_nothing() {
    let store = store().await;
    let policy = BorrowLimitPolicy::new(1, true);
    let email = unique_email();
    let book = store.insert_book(input("Dune", "Sci-Fi", 5).into_book(Uuid::new_v4())).await.unwrap();

    store.checkout(record(book.id, &email), &policy).await.unwrap();
    let err = store.checkout(record(book.id, &email), &policy).await.unwrap_err();
    assert!(matches!(err, AppError::BorrowLimitExceeded { limit: 1, .. }));

    assert_eq!(store.get_book(book.id).await.unwrap().quantity, 4);
    assert_eq!(store.list_borrows(&email).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_checkout_then_checkin_restores_state() {
    let store = store().await;
    let policy = BorrowLimitPolicy::default();
    let email = unique_email();
    let book = store.insert_book(input("Dune", "Sci-Fi", 2).into_book(Uuid::new_v4())).await.unwrap();

    let (rec, after) = store.checkout(record(book.id, &email), &policy).await.unwrap();
    assert_eq!(after.quantity, 1);

    let (_, after) = store.checkin(rec.id).await.unwrap();
    assert_eq!(after.quantity, 2);
    assert!(store.list_borrows(&email).await.unwrap().is_empty());
    assert!(matches!(store.checkin(rec.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn test_replace_reports_created_then_replaced() {
    let store = store().await;
    let id = Uuid::new_v4();

    let first = store.replace_book(input("Old", "X", 1).into_book(id)).await.unwrap();
    assert!(first.created);

    let second = store.replace_book(input("New", "X", 4).into_book(id)).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.book.title, "New");
    assert_eq!(store.get_book(id).await.unwrap().quantity, 4);
}

#[tokio::test]
#[ignore]
async fn test_category_filter_is_case_insensitive_and_exact() {
    let store = store().await;
    let category = format!("fiction-{}", Uuid::new_v4());
    let wanted = store.insert_book(input("A", &category, 1).into_book(Uuid::new_v4())).await.unwrap();
    store
        .insert_book(input("B", &format!("{}-Classic", category), 1).into_book(Uuid::new_v4()))
        .await
        .unwrap();

    let found = store.list_books(Some(&category.to_uppercase())).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, wanted.id);
}

#[tokio::test]
#[ignore]
async fn test_quantity_delta_round_trip() {
    let store = store().await;
    let book = store.insert_book(input("Dune", "Sci-Fi", 0).into_book(Uuid::new_v4())).await.unwrap();

    let borrowed = store.adjust_quantity(book.id, QuantityDelta::Borrow).await.unwrap();
    assert_eq!(borrowed.quantity, -1);
    let returned = store.adjust_quantity(book.id, QuantityDelta::Return).await.unwrap();
    assert_eq!(returned.quantity, 0);

    let err = store
        .adjust_quantity(Uuid::new_v4(), QuantityDelta::Return)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
