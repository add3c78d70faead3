//! Repository layer for database operations
//!
//! Each entity table sits behind a store trait so services can be built over
//! PostgreSQL in production and over mocks in tests.

pub mod books;
pub mod reservations;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort, CreateBook, Pagination, UpdateBook},
        reservation::{HistoryRow, Reservation},
        user::{NewUser, User, UserChanges},
    },
};

/// Result of an attempt to reserve a book
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    Reserved(Reservation),
    /// The book does not exist or is disabled
    BookNotFound,
    /// The book is active but already reserved
    BookUnavailable,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user; disabled users are only returned when `include_disabled` is set
    async fn get_by_id(&self, id: i32, include_disabled: bool) -> AppResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Apply changes; `None` when the user does not exist
    async fn update(&self, id: i32, changes: &UserChanges) -> AppResult<Option<User>>;

    /// Soft delete; false when the user does not exist
    async fn disable(&self, id: i32) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get_by_id(&self, id: i32, include_disabled: bool) -> AppResult<Option<Book>>;

    /// Filtered page of books and the total number of matches
    async fn search(&self, query: &BookQuery, page: Pagination) -> AppResult<(Vec<BookShort>, i64)>;

    async fn create(&self, book: &CreateBook) -> AppResult<Book>;

    /// Apply changes regardless of the active flag; `None` when the book does not exist
    async fn update(&self, id: i32, changes: &UpdateBook) -> AppResult<Option<Book>>;

    /// Soft delete, also clearing availability; false when the book does not exist
    async fn disable(&self, id: i32) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Mark the book unavailable and record the reservation as one atomic unit
    async fn reserve(&self, user_id: i32, book_id: i32) -> AppResult<ReserveOutcome>;

    /// Reservations of a book, newest first, with the reserving user's name
    async fn history_for_book(&self, book_id: i32, include_disabled: bool) -> AppResult<Vec<HistoryRow>>;

    /// Reservations made by a user, newest first, with the book title
    async fn history_for_user(&self, user_id: i32, include_disabled: bool) -> AppResult<Vec<HistoryRow>>;
}

/// Connectivity probe used by the readiness endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl StoreHealth for Pool<Postgres> {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

/// Main repository struct holding one handle per table
#[derive(Clone)]
pub struct Repository {
    pub health: Arc<dyn StoreHealth>,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub reservations: Arc<dyn ReservationStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            reservations: Arc::new(reservations::ReservationsRepository::new(pool.clone())),
            health: Arc::new(pool),
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_stores(
        health: Arc<dyn StoreHealth>,
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        reservations: Arc<dyn ReservationStore>,
    ) -> Self {
        Self {
            health,
            users,
            books,
            reservations,
        }
    }
}

/// Escape LIKE wildcards and wrap the term for a substring match
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("King"), "%King%");
        assert_eq!(like_pattern("100%_real"), r"%100\%\_real%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
