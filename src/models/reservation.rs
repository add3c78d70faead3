//! Reservation model and history views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Shown instead of the reserving user's name when that user is hidden
pub const REMOVED_USER_NAME: &str = "Usuario eliminado";
/// Shown instead of the reserved book's title when that book is hidden
pub const REMOVED_BOOK_TITLE: &str = "Libro eliminado";

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i32,
    #[serde(rename = "usuarioId")]
    pub user_id: i32,
    #[serde(rename = "libroId")]
    pub book_id: i32,
    #[serde(rename = "fechaReserva")]
    pub reserved_at: DateTime<Utc>,
    /// Never set by the current API
    #[serde(rename = "fechaEntrega")]
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reserve request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    pub libro_id: i32,
}

/// History row as read from the store; `name` is NULL when the joined entity is hidden
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub name: Option<String>,
    pub reserved_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// One reservation of a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookHistoryEntry {
    pub nombre_persona: String,
    pub fecha_reserva: DateTime<Utc>,
    pub fecha_entrega: Option<DateTime<Utc>>,
}

impl From<HistoryRow> for BookHistoryEntry {
    fn from(row: HistoryRow) -> Self {
        BookHistoryEntry {
            nombre_persona: row.name.unwrap_or_else(|| REMOVED_USER_NAME.to_string()),
            fecha_reserva: row.reserved_at,
            fecha_entrega: row.returned_at,
        }
    }
}

/// One reservation made by a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserHistoryEntry {
    pub nombre_libro: String,
    pub fecha_reserva: DateTime<Utc>,
    pub fecha_entrega: Option<DateTime<Utc>>,
}

impl From<HistoryRow> for UserHistoryEntry {
    fn from(row: HistoryRow) -> Self {
        UserHistoryEntry {
            nombre_libro: row.name.unwrap_or_else(|| REMOVED_BOOK_TITLE.to_string()),
            fecha_reserva: row.reserved_at,
            fecha_entrega: row.returned_at,
        }
    }
}

/// Reservation history of a book, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookHistory {
    pub libro_id: i32,
    pub historial: Vec<BookHistoryEntry>,
}

/// Reservation history of a user, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserHistory {
    pub usuario_id: i32,
    pub historial: Vec<UserHistoryEntry>,
}
