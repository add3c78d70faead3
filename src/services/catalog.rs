//! Book lifecycle: catalogue, availability and soft deletion

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookPage, BookQuery, CreateBook, Pagination, UpdateBook},
        permission::Permission,
    },
    policy::{authorize_book_update, Actor},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the catalogue; new books are active and available
    pub async fn create_book(&self, actor: &Actor, book: CreateBook) -> AppResult<Book> {
        actor.require(&[Permission::CrearLibros])?;
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            actor_id = actor.user_id,
            actor_email = %actor.email,
            book_id = created.id,
            "Book created"
        );
        Ok(created)
    }

    /// Search books with filters, one page at a time
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<BookPage> {
        let pagination = Pagination::from_query(query.page, query.limit);
        let (books, total) = self.repository.books.search(query, pagination).await?;
        Ok(BookPage::new(books, total, pagination))
    }

    pub async fn get_book(&self, id: i32, include_disabled: bool) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id, include_disabled)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Update a book. Catalogue fields need `modificar_libros`, availability does not.
    pub async fn update_book(&self, actor: &Actor, id: i32, changes: UpdateBook) -> AppResult<Book> {
        let existing = self.get_book(id, true).await?;

        authorize_book_update(actor, &changes)
            .or_forbidden("You do not have permission to modify book details")?;

        if changes.is_empty() {
            return Ok(existing);
        }

        let book = self
            .repository
            .books
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        if let Some(available) = changes.disponible {
            if available != existing.available {
                // Bypasses the reservation ledger
                tracing::info!(
                    actor_id = actor.user_id,
                    book_id = id,
                    available,
                    "Book availability changed manually"
                );
            }
        }

        Ok(book)
    }

    /// Soft delete a book; it also stops being available
    pub async fn disable_book(&self, actor: &Actor, id: i32) -> AppResult<()> {
        actor.require(&[Permission::DeshabilitarLibros])?;

        if !self.repository.books.disable(id).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        tracing::info!(actor_id = actor.user_id, actor_email = %actor.email, book_id = id, "Book disabled");
        Ok(())
    }
}
