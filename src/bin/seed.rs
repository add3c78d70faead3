//! # Seed Data Loader
//!
//! Fills a development database with a catalogue of well-known books and
//! three sample accounts.
//!
//! ## Usage
//! ```bash
//! # Use the database from configuration / DATABASE_URL
//! cargo run --bin seed
//!
//! # Point at another database
//! cargo run --bin seed -- --database-url postgres://localhost/biblioteca_dev
//! ```
//!
//! Books whose title already exists are skipped. Sample accounts that already
//! exist get their password, permissions and active flag reset.

use std::env;

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use biblioteca_server::{
    config::AppConfig,
    models::permission::{Permission, PermissionSet},
    services::credentials::CredentialService,
};

/// (title, author, genre, (year, month, day), publisher)
type SeedBook = (&'static str, &'static str, &'static str, (i32, u32, u32), &'static str);

const BOOKS: &[SeedBook] = &[
    ("El Quijote de la Mancha", "Miguel de Cervantes", "Novela", (1605, 1, 1), "Francisco de Robles"),
    ("Cien años de soledad", "Gabriel García Márquez", "Realismo mágico", (1967, 5, 30), "Sudamericana"),
    ("1984", "George Orwell", "Ciencia ficción", (1949, 6, 8), "Secker & Warburg"),
    ("El señor de los anillos", "J.R.R. Tolkien", "Fantasía", (1954, 7, 29), "Allen & Unwin"),
    ("Don Juan Tenorio", "José Zorrilla", "Drama", (1844, 3, 28), "Imprenta de D. Vicente de Lalama"),
    ("La Odisea", "Homero", "Épica", (-800, 1, 1), "Antigua Grecia"),
    ("Romeo y Julieta", "William Shakespeare", "Tragedia", (1597, 1, 1), "John Danter"),
    ("El código Da Vinci", "Dan Brown", "Thriller", (2003, 3, 18), "Doubleday"),
    ("Harry Potter y la piedra filosofal", "J.K. Rowling", "Fantasía", (1997, 6, 26), "Bloomsbury"),
    ("El principito", "Antoine de Saint-Exupéry", "Literatura infantil", (1943, 4, 6), "Reynal & Hitchcock"),
    ("Crónica de una muerte anunciada", "Gabriel García Márquez", "Realismo mágico", (1981, 1, 1), "La Oveja Negra"),
    ("El amor en los tiempos del cólera", "Gabriel García Márquez", "Realismo mágico", (1985, 1, 1), "Oveja Negra"),
    ("Rebelión en la granja", "George Orwell", "Sátira", (1945, 8, 17), "Secker & Warburg"),
    ("El hobbit", "J.R.R. Tolkien", "Fantasía", (1937, 9, 21), "Allen & Unwin"),
    ("El Silmarillion", "J.R.R. Tolkien", "Fantasía", (1977, 9, 15), "Allen & Unwin"),
    ("Hamlet", "William Shakespeare", "Tragedia", (1603, 1, 1), "Nicolas Ling y John Trundell"),
    ("Macbeth", "William Shakespeare", "Tragedia", (1623, 1, 1), "Edward Blount y William Jaggard"),
    ("La Ilíada", "Homero", "Épica", (-800, 1, 1), "Antigua Grecia"),
    ("La divina comedia", "Dante Alighieri", "Épica", (1320, 1, 1), "Manuscrito"),
    ("Los miserables", "Victor Hugo", "Novela", (1862, 1, 1), "A. Lacroix, Verboeckhoven & Cie"),
    ("El conde de Montecristo", "Alexandre Dumas", "Aventura", (1844, 1, 1), "Pétion"),
    ("Los tres mosqueteros", "Alexandre Dumas", "Aventura", (1844, 3, 14), "Baudry"),
    ("Drácula", "Bram Stoker", "Terror", (1897, 5, 26), "Archibald Constable and Company"),
    ("Frankenstein", "Mary Shelley", "Terror", (1818, 1, 1), "Lackington, Hughes, Harding, Mavor & Jones"),
    ("Orgullo y prejuicio", "Jane Austen", "Romance", (1813, 1, 28), "T. Egerton"),
    ("Cumbres borrascosas", "Emily Brontë", "Romance", (1847, 12, 1), "Thomas Cautley Newby"),
    ("El retrato de Dorian Gray", "Oscar Wilde", "Filosófico", (1890, 7, 1), "Ward, Lock and Company"),
    ("El gran Gatsby", "F. Scott Fitzgerald", "Novela", (1925, 4, 10), "Charles Scribner's Sons"),
    ("Matar a un ruiseñor", "Harper Lee", "Novela", (1960, 7, 11), "J. B. Lippincott & Co."),
    ("El guardián entre el centeno", "J.D. Salinger", "Novela", (1951, 7, 16), "Little, Brown and Company"),
    ("Las aventuras de Tom Sawyer", "Mark Twain", "Aventura", (1876, 12, 1), "American Publishing Company"),
    ("Las aventuras de Huckleberry Finn", "Mark Twain", "Aventura", (1884, 12, 10), "Chatto & Windus"),
    ("Moby Dick", "Herman Melville", "Aventura", (1851, 10, 18), "Richard Bentley"),
    ("El proceso", "Franz Kafka", "Filosófico", (1925, 1, 1), "Verlag Die Schmiede"),
    ("La metamorfosis", "Franz Kafka", "Filosófico", (1915, 10, 1), "Kurt Wolff Verlag"),
    ("Crimen y castigo", "Fiódor Dostoyevski", "Filosófico", (1866, 1, 1), "The Russian Messenger"),
    ("Los hermanos Karamazov", "Fiódor Dostoyevski", "Filosófico", (1880, 1, 1), "The Russian Messenger"),
    ("Guerra y paz", "León Tolstói", "Novela histórica", (1869, 1, 1), "The Russian Messenger"),
    ("Ana Karenina", "León Tolstói", "Novela", (1877, 1, 1), "The Russian Messenger"),
    ("El nombre de la rosa", "Umberto Eco", "Misterio", (1980, 1, 1), "Bompiani"),
    ("Rayuela", "Julio Cortázar", "Novela experimental", (1963, 6, 28), "Sudamericana"),
    ("Ficciones", "Jorge Luis Borges", "Cuento", (1944, 1, 1), "Sur"),
    ("Pedro Páramo", "Juan Rulfo", "Realismo mágico", (1955, 1, 1), "Fondo de Cultura Económica"),
    ("La casa de los espíritus", "Isabel Allende", "Realismo mágico", (1982, 1, 1), "Plaza & Janés"),
];

/// (name, email, password, permissions)
const USERS: &[(&str, &str, &str, &[Permission])] = &[
    ("Administrador", "admin@biblioteca.com", "admin123", &Permission::ALL),
    ("Juan Pérez", "juan@example.com", "password123", &[]),
    ("María García", "maria@example.com", "password123", &[Permission::CrearLibros]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let mut database_url: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--database-url" | "-d" => {
                if i + 1 < args.len() {
                    database_url = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Biblioteca seed data loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --database-url <URL>  Database to seed (default: from configuration)");
                println!("  -h, --help                Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    let database_url = database_url.unwrap_or_else(|| config.database.url.clone());

    println!("Biblioteca seed data loader");
    println!("===========================");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    println!("✓ Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    println!("✓ Migrations applied");

    let (inserted, skipped) = seed_books(&pool).await?;
    println!("✓ Books: {} inserted, {} already present", inserted, skipped);

    let credentials = CredentialService::new(config.auth.clone());
    seed_users(&pool, &credentials).await?;
    println!("✓ Users ready:");
    for (_, email, password, _) in USERS {
        println!("    {} / {}", email, password);
    }

    Ok(())
}

async fn seed_books(pool: &Pool<Postgres>) -> anyhow::Result<(usize, usize)> {
    let mut inserted = 0;
    let mut skipped = 0;

    for (title, author, genre, (year, month, day), publisher) in BOOKS {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE title = $1)")
            .bind(*title)
            .fetch_one(pool)
            .await?;
        if exists {
            skipped += 1;
            continue;
        }

        let date = NaiveDate::from_ymd_opt(*year, *month, *day)
            .with_context(|| format!("Invalid publication date for {}", title))?;

        sqlx::query(
            r#"
            INSERT INTO books (title, author, genre, publication_date, publisher)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*title)
        .bind(*author)
        .bind(*genre)
        .bind(date)
        .bind(*publisher)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to insert {}", title))?;

        inserted += 1;
    }

    Ok((inserted, skipped))
}

async fn seed_users(pool: &Pool<Postgres>, credentials: &CredentialService) -> anyhow::Result<()> {
    for (name, email, password, permissions) in USERS {
        let hash = credentials.hash_password(password)?;
        let permissions: PermissionSet = permissions.iter().copied().collect();

        sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, permissions, active)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                permissions = EXCLUDED.permissions,
                active = TRUE,
                updated_at = NOW()
            "#,
        )
        .bind(*name)
        .bind(*email)
        .bind(hash)
        .bind(permissions.to_stored())
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed user {}", email))?;
    }

    Ok(())
}
