//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, BookShort, CreateBook, Pagination, UpdateBook},
};

use super::{like_pattern, BookStore};

const BOOK_COLUMNS: &str =
    "id, title, author, genre, publication_date, publisher, available, active, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause shared by the count and page queries
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    builder.push(" WHERE TRUE");

    if !query.include_disabled {
        builder.push(" AND active = TRUE");
    }
    if let Some(ref genre) = query.genero {
        builder.push(" AND genre = ").push_bind(genre.clone());
    }
    if let Some(ref publisher) = query.editorial {
        builder.push(" AND publisher = ").push_bind(publisher.clone());
    }
    if let Some(ref author) = query.autor {
        builder
            .push(" AND author ILIKE ")
            .push_bind(like_pattern(author))
            .push(" ESCAPE '\\'");
    }
    if let Some(ref title) = query.nombre {
        builder
            .push(" AND title ILIKE ")
            .push_bind(like_pattern(title))
            .push(" ESCAPE '\\'");
    }
    if let Some(available) = query.disponible {
        builder.push(" AND available = ").push_bind(available);
    }
    if let Some(date) = query.fecha_publicacion {
        builder.push(" AND publication_date = ").push_bind(date);
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn get_by_id(&self, id: i32, include_disabled: bool) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1 AND ($2 OR active)",
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(include_disabled)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn search(&self, query: &BookQuery, page: Pagination) -> AppResult<(Vec<BookShort>, i64)> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM books");
        push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select_builder = QueryBuilder::new("SELECT id, title AS nombre FROM books");
        push_filters(&mut select_builder, query);
        select_builder
            .push(" ORDER BY title ASC, id ASC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let books = select_builder
            .build_query_as::<BookShort>()
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, publication_date, publisher, available, active)
            VALUES ($1, $2, $3, $4, $5, TRUE, TRUE)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.nombre)
        .bind(&book.autor)
        .bind(&book.genero)
        .bind(book.fecha_publicacion)
        .bind(&book.editorial)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i32, changes: &UpdateBook) -> AppResult<Option<Book>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE books SET updated_at = NOW()");

        if let Some(ref title) = changes.nombre {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(ref author) = changes.autor {
            builder.push(", author = ").push_bind(author.clone());
        }
        if let Some(ref genre) = changes.genero {
            builder.push(", genre = ").push_bind(genre.clone());
        }
        if let Some(date) = changes.fecha_publicacion {
            builder.push(", publication_date = ").push_bind(date);
        }
        if let Some(ref publisher) = changes.editorial {
            builder.push(", publisher = ").push_bind(publisher.clone());
        }
        if let Some(available) = changes.disponible {
            builder.push(", available = ").push_bind(available);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(BOOK_COLUMNS);

        let book = builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn disable(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET active = FALSE, available = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
