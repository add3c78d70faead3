//! PostgreSQL store tests
//!
//! Each test gets a fresh database from `#[sqlx::test]`, so DATABASE_URL must
//! point at a server where the user may create databases.
//! Run with: cargo test --test store_tests -- --ignored

use chrono::NaiveDate;
use sqlx::PgPool;

use biblioteca_server::{
    error::AppError,
    models::{
        book::{BookQuery, CreateBook, Pagination},
        permission::{Permission, PermissionSet},
        reservation::REMOVED_USER_NAME,
        user::NewUser,
    },
    repository::{
        books::BooksRepository, reservations::ReservationsRepository, users::UsersRepository,
        BookStore, ReservationStore, ReserveOutcome, UserStore,
    },
};

fn book(title: &str, author: &str, genre: &str) -> CreateBook {
    CreateBook {
        nombre: title.to_string(),
        autor: author.to_string(),
        genero: genre.to_string(),
        fecha_publicacion: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        editorial: "Editorial".to_string(),
    }
}

fn user(email: &str) -> NewUser {
    NewUser {
        name: "Lectora".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        permissions: PermissionSet::new(),
    }
}

#[sqlx::test]
#[ignore]
async fn test_concurrent_reservations_only_one_wins(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool.clone());
    let users = UsersRepository::new(pool.clone());
    let reservations = ReservationsRepository::new(pool.clone());

    let target = books.create(&book("It", "Stephen King", "Terror")).await?;
    let a = users.create(&user("a@example.com")).await?;
    let b = users.create(&user("b@example.com")).await?;

    let (first, second) = tokio::join!(
        reservations.reserve(a.id, target.id),
        reservations.reserve(b.id, target.id)
    );

    let outcomes = [first?, second?];
    let reserved = outcomes
        .iter()
        .filter(|o| matches!(o, ReserveOutcome::Reserved(_)))
        .count();
    let unavailable = outcomes
        .iter()
        .filter(|o| matches!(o, ReserveOutcome::BookUnavailable))
        .count();
    assert_eq!((reserved, unavailable), (1, 1));

    let stored = books.get_by_id(target.id, false).await?.expect("book exists");
    assert!(!stored.available);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE book_id = $1")
        .bind(target.id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_disabled_or_missing_books_are_not_found(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool.clone());
    let users = UsersRepository::new(pool.clone());
    let reservations = ReservationsRepository::new(pool.clone());

    let target = books.create(&book("Carrie", "Stephen King", "Terror")).await?;
    let reader = users.create(&user("reader@example.com")).await?;

    assert!(books.disable(target.id).await?);
    // Disabling twice is not an error
    assert!(books.disable(target.id).await?);

    assert!(books.get_by_id(target.id, false).await?.is_none());
    let hidden = books.get_by_id(target.id, true).await?.expect("visible on request");
    assert!(!hidden.active && !hidden.available);

    assert!(matches!(
        reservations.reserve(reader.id, target.id).await?,
        ReserveOutcome::BookNotFound
    ));
    assert!(matches!(
        reservations.reserve(reader.id, 999_999).await?,
        ReserveOutcome::BookNotFound
    ));
    assert!(!books.disable(999_999).await?);

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_pagination_and_ordering(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool);

    for i in 0..12 {
        books
            .create(&book(&format!("Libro {:02}", 11 - i), "Autor", "Novela"))
            .await?;
    }

    let query = BookQuery::default();
    let page = Pagination::from_query(Some(3), Some(5));
    let (rows, total) = books.search(&query, page).await?;
    assert_eq!(total, 12);
    assert_eq!(page.max_page(total), 3);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].nombre, "Libro 10");
    assert_eq!(rows[1].nombre, "Libro 11");

    let (first, _) = books.search(&query, Pagination::from_query(None, Some(5))).await?;
    assert_eq!(first[0].nombre, "Libro 00");

    let (beyond, total) = books.search(&query, Pagination::from_query(Some(4), Some(5))).await?;
    assert!(beyond.is_empty());
    assert_eq!(total, 12);

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_search_filters(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool);

    books.create(&book("El resplandor", "Stephen King", "Terror")).await?;
    books.create(&book("Carrie", "Stephen King", "Terror")).await?;
    books.create(&book("Emma", "Jane Austen", "Romance")).await?;
    let hidden = books.create(&book("Misery", "Stephen King", "Terror")).await?;
    books.disable(hidden.id).await?;

    let page = Pagination::from_query(None, None);

    let by_author = BookQuery {
        autor: Some("king".to_string()),
        ..Default::default()
    };
    assert_eq!(books.search(&by_author, page).await?.1, 2);

    let with_disabled = BookQuery {
        include_disabled: true,
        ..by_author.clone()
    };
    assert_eq!(books.search(&with_disabled, page).await?.1, 3);

    let by_genre = BookQuery {
        genero: Some("Romance".to_string()),
        ..Default::default()
    };
    let (rows, _) = books.search(&by_genre, page).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nombre, "Emma");

    // Wildcards in the search term are literal
    let wildcard = BookQuery {
        nombre: Some("%".to_string()),
        ..Default::default()
    };
    assert_eq!(books.search(&wildcard, page).await?.1, 0);

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_search_by_availability_date_and_publisher(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool.clone());
    let users = UsersRepository::new(pool.clone());
    let reservations = ReservationsRepository::new(pool.clone());

    let mut solitude = book("Cien años de soledad", "Gabriel García Márquez", "Realismo mágico");
    solitude.fecha_publicacion = NaiveDate::from_ymd_opt(1967, 5, 30).unwrap();
    solitude.editorial = "Sudamericana".to_string();
    let solitude = books.create(&solitude).await?;

    let mut hopscotch = book("Rayuela", "Julio Cortázar", "Novela experimental");
    hopscotch.fecha_publicacion = NaiveDate::from_ymd_opt(1963, 6, 28).unwrap();
    hopscotch.editorial = "Sudamericana".to_string();
    books.create(&hopscotch).await?;

    books.create(&book("Emma", "Jane Austen", "Romance")).await?;

    let reader = users.create(&user("filters@example.com")).await?;
    assert!(matches!(
        reservations.reserve(reader.id, solitude.id).await?,
        ReserveOutcome::Reserved(_)
    ));

    let page = Pagination::from_query(None, None);

    let unavailable = BookQuery {
        disponible: Some(false),
        ..Default::default()
    };
    let (rows, total) = books.search(&unavailable, page).await?;
    assert_eq!(total, 1);
    assert_eq!(rows[0].id, solitude.id);

    let available = BookQuery {
        disponible: Some(true),
        ..Default::default()
    };
    assert_eq!(books.search(&available, page).await?.1, 2);

    let by_date = BookQuery {
        fecha_publicacion: NaiveDate::from_ymd_opt(1967, 5, 30),
        ..Default::default()
    };
    let (rows, total) = books.search(&by_date, page).await?;
    assert_eq!(total, 1);
    assert_eq!(rows[0].nombre, "Cien años de soledad");

    let by_publisher = BookQuery {
        editorial: Some("Sudamericana".to_string()),
        ..Default::default()
    };
    let (rows, total) = books.search(&by_publisher, page).await?;
    assert_eq!(total, 2);
    assert_eq!(rows[0].nombre, "Cien años de soledad");
    assert_eq!(rows[1].nombre, "Rayuela");

    // Publisher is an exact match, not a substring
    let partial_publisher = BookQuery {
        editorial: Some("Sudamericana S.A.".to_string()),
        ..Default::default()
    };
    assert_eq!(books.search(&partial_publisher, page).await?.1, 0);

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_history(pool: PgPool) -> anyhow::Result<()> {
    let books = BooksRepository::new(pool.clone());
    let users = UsersRepository::new(pool.clone());
    let reservations = ReservationsRepository::new(pool.clone());

    let target = books.create(&book("Drácula", "Bram Stoker", "Terror")).await?;
    let reader = users.create(&user("history@example.com")).await?;
    reservations.reserve(reader.id, target.id).await?;

    assert!(reservations.history_for_book(999_999, false).await?.is_empty());
    assert!(reservations.history_for_user(999_999, false).await?.is_empty());

    let rows = reservations.history_for_book(target.id, false).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("Lectora"));
    assert!(rows[0].returned_at.is_none());

    users.disable(reader.id).await?;
    let entries: Vec<biblioteca_server::models::reservation::BookHistoryEntry> = reservations
        .history_for_book(target.id, false)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    assert_eq!(entries[0].nombre_persona, REMOVED_USER_NAME);

    let rows = reservations.history_for_book(target.id, true).await?;
    assert_eq!(rows[0].name.as_deref(), Some("Lectora"));

    let rows = reservations.history_for_user(reader.id, false).await?;
    assert_eq!(rows[0].name.as_deref(), Some("Drácula"));

    Ok(())
}

#[sqlx::test]
#[ignore]
async fn test_users_store(pool: PgPool) -> anyhow::Result<()> {
    let users = UsersRepository::new(pool);

    let mut new_user = user("perms@example.com");
    new_user.permissions = PermissionSet::from(vec![Permission::CrearLibros, Permission::ModificarLibros]);
    let created = users.create(&new_user).await?;
    assert!(created.active);
    assert!(created.permissions.contains(Permission::ModificarLibros));

    let duplicate = users.create(&user("perms@example.com")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    assert!(users.email_exists("perms@example.com", None).await?);
    assert!(!users.email_exists("perms@example.com", Some(created.id)).await?);

    let found = users.get_by_email("perms@example.com").await?.expect("user exists");
    assert_eq!(found.password, new_user.password_hash);

    assert!(users.disable(created.id).await?);
    assert!(users.get_by_id(created.id, false).await?.is_none());
    assert!(users.get_by_id(created.id, true).await?.is_some());
    // Login needs to see disabled accounts to report them
    assert!(users.get_by_email("perms@example.com").await?.is_some());

    Ok(())
}
