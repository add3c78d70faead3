//! Reservations repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::reservation::{HistoryRow, Reservation},
};

use super::{ReservationStore, ReserveOutcome};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationsRepository {
    async fn reserve(&self, user_id: i32, book_id: i32) -> AppResult<ReserveOutcome> {
        let mut tx = self.pool.begin().await?;

        // The guarded update takes the row lock; a concurrent reserve blocks here
        // and then re-checks the predicate against the committed row.
        let claimed: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET available = FALSE, updated_at = NOW()
            WHERE id = $1 AND active = TRUE AND available = TRUE
            RETURNING id
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let active: Option<bool> =
                sqlx::query_scalar("SELECT available FROM books WHERE id = $1 AND active = TRUE")
                    .bind(book_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Ok(match active {
                None => ReserveOutcome::BookNotFound,
                Some(_) => ReserveOutcome::BookUnavailable,
            });
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, book_id, reserved_at)
            VALUES ($1, $2, NOW())
            RETURNING id, user_id, book_id, reserved_at, returned_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReserveOutcome::Reserved(reservation))
    }

    async fn history_for_book(&self, book_id: i32, include_disabled: bool) -> AppResult<Vec<HistoryRow>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT u.name AS name, r.reserved_at, r.returned_at
            FROM reservations r
            LEFT JOIN users u ON u.id = r.user_id AND ($2 OR u.active)
            WHERE r.book_id = $1
            ORDER BY r.reserved_at DESC, r.id DESC
            "#,
        )
        .bind(book_id)
        .bind(include_disabled)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn history_for_user(&self, user_id: i32, include_disabled: bool) -> AppResult<Vec<HistoryRow>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT b.title AS name, r.reserved_at, r.returned_at
            FROM reservations r
            LEFT JOIN books b ON b.id = r.book_id AND ($2 OR b.active)
            WHERE r.user_id = $1
            ORDER BY r.reserved_at DESC, r.id DESC
            "#,
        )
        .bind(user_id)
        .bind(include_disabled)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
