//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserChanges, UserRow},
};

use super::UserStore;

const USER_COLUMNS: &str = "id, name, email, password_hash, permissions, active, created_at, updated_at";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn email_conflict(err: AppError) -> AppError {
    if err.is_unique_violation() {
        AppError::Conflict("Email is already registered".to_string())
    } else {
        err
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn get_by_id(&self, id: i32, include_disabled: bool) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND ($2 OR active)",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(include_disabled)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::INTEGER IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, permissions)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.permissions.to_stored())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| email_conflict(e.into()))?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> AppResult<Option<User>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = NOW()");

        if let Some(ref name) = changes.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(ref email) = changes.email {
            builder.push(", email = ").push_bind(email.clone());
        }
        if let Some(ref hash) = changes.password_hash {
            builder.push(", password_hash = ").push_bind(hash.clone());
        }
        if let Some(ref permissions) = changes.permissions {
            builder.push(", permissions = ").push_bind(permissions.to_stored());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(USER_COLUMNS);

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| email_conflict(e.into()))?;

        Ok(row.map(User::from))
    }

    async fn disable(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
