//! Book (catalogue) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "fechaPublicacion")]
    pub publication_date: NaiveDate,
    #[serde(rename = "editorial")]
    pub publisher: String,
    #[serde(rename = "disponible")]
    pub available: bool,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub nombre: String,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub autor: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genero: String,
    #[serde(deserialize_with = "super::flexible_date")]
    pub fecha_publicacion: NaiveDate,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub editorial: String,
}

/// Update book request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub nombre: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub autor: Option<String>,
    #[validate(length(min = 1, message = "Genre cannot be empty"))]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "super::flexible_date_opt")]
    pub fecha_publicacion: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Publisher cannot be empty"))]
    pub editorial: Option<String>,
    pub disponible: Option<bool>,
}

impl UpdateBook {
    /// True when any informational (catalogue) field is being changed
    pub fn touches_catalog_fields(&self) -> bool {
        self.nombre.is_some()
            || self.autor.is_some()
            || self.genero.is_some()
            || self.fecha_publicacion.is_some()
            || self.editorial.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_catalog_fields() && self.disponible.is_none()
    }
}

/// Book listing query parameters
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact genre
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub genero: Option<String>,
    /// Exact publisher
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub editorial: Option<String>,
    /// Author substring
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub autor: Option<String>,
    /// Title substring
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub nombre: Option<String>,
    /// Availability (`true` or anything else for false)
    #[serde(default, deserialize_with = "super::optional_flag")]
    pub disponible: Option<bool>,
    /// Exact publication day (YYYY-MM-DD or RFC 3339)
    #[serde(default, deserialize_with = "super::query_date")]
    pub fecha_publicacion: Option<NaiveDate>,
    /// Page number, starting at 1
    #[serde(default, deserialize_with = "super::lenient_number")]
    pub page: Option<i64>,
    /// Page size, 1 to 100 (default 10)
    #[serde(default, deserialize_with = "super::lenient_number")]
    pub limit: Option<i64>,
    /// Include disabled books
    #[serde(default, deserialize_with = "super::lenient_flag")]
    pub include_disabled: bool,
}

/// Normalised page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Missing or zero values fall back to defaults; others are clamped
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p != 0 => p.max(1),
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l != 0 => l.clamp(1, MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages for `total` rows, never less than one
    pub fn max_page(&self, total: i64) -> i64 {
        ((total + self.limit - 1) / self.limit).max(1)
    }
}

/// Pagination metadata for book listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub pagina_actual: i64,
    pub pagina_maxima: i64,
    pub libros_por_pagina: i64,
    pub total_libros: i64,
}

/// One page of books
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookPage {
    pub libros: Vec<BookShort>,
    pub paginacion: PageInfo,
}

impl BookPage {
    pub fn new(books: Vec<BookShort>, total: i64, pagination: Pagination) -> Self {
        Self {
            libros: books,
            paginacion: PageInfo {
                pagina_actual: pagination.page,
                pagina_maxima: pagination.max_page(total),
                libros_por_pagina: pagination.limit,
                total_libros: total,
            },
        }
    }
}
