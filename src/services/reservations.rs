//! Reservation ledger

use crate::{
    error::{AppError, AppResult},
    models::reservation::{BookHistory, Reservation, UserHistory},
    policy::Actor,
    repository::{Repository, ReserveOutcome},
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve an active, available book for the acting user
    pub async fn reserve(&self, actor: &Actor, book_id: i32) -> AppResult<Reservation> {
        match self.repository.reservations.reserve(actor.user_id, book_id).await? {
            ReserveOutcome::Reserved(reservation) => {
                tracing::info!(
                    user_id = actor.user_id,
                    book_id,
                    reservation_id = reservation.id,
                    "Book reserved"
                );
                Ok(reservation)
            }
            ReserveOutcome::BookNotFound => Err(AppError::NotFound("Book not found".to_string())),
            ReserveOutcome::BookUnavailable => {
                Err(AppError::Conflict("Book is not available".to_string()))
            }
        }
    }

    /// Reservations of a book, newest first. Unknown ids give an empty history.
    pub async fn history_for_book(&self, book_id: i32, include_disabled: bool) -> AppResult<BookHistory> {
        let rows = self
            .repository
            .reservations
            .history_for_book(book_id, include_disabled)
            .await?;

        Ok(BookHistory {
            libro_id: book_id,
            historial: rows.into_iter().map(Into::into).collect(),
        })
    }

    /// Reservations made by a user, newest first. Unknown ids give an empty history.
    pub async fn history_for_user(&self, user_id: i32, include_disabled: bool) -> AppResult<UserHistory> {
        let rows = self
            .repository
            .reservations
            .history_for_user(user_id, include_disabled)
            .await?;

        Ok(UserHistory {
            usuario_id: user_id,
            historial: rows.into_iter().map(Into::into).collect(),
        })
    }
}
