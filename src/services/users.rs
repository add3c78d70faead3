//! User account lifecycle: registration, login and self-or-privileged changes

use crate::{
    error::{AppError, AppResult},
    models::{
        permission::Permission,
        user::{LoginRequest, NewUser, RegisterUser, UpdateUser, User, UserChanges},
    },
    policy::{authorize_self_or, Actor},
    repository::Repository,
};

use super::credentials::{CredentialService, TokenClaims};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    credentials: CredentialService,
}

impl UsersService {
    pub fn new(repository: Repository, credentials: CredentialService) -> Self {
        Self { repository, credentials }
    }

    /// Create an account and return it with a fresh token
    pub async fn register(&self, request: RegisterUser) -> AppResult<(User, String)> {
        if self.repository.users.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let new_user = NewUser {
            name: request.nombre,
            email: request.email,
            password_hash: self.credentials.hash_password(&request.password)?,
            permissions: request.permisos.unwrap_or_default(),
        };

        let user = self.repository.users.create(&new_user).await?;
        let token = self.credentials.issue_token(user.id, &user.email)?;

        tracing::info!(user_id = user.id, "User registered");
        Ok((user, token))
    }

    /// Authenticate by email and password
    pub async fn login(&self, request: LoginRequest) -> AppResult<(User, String)> {
        let Some(user) = self.repository.users.get_by_email(&request.email).await? else {
            self.credentials.verify_unknown(&request.password);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !self.credentials.verify_password(&request.password, &user.password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        // Only reported once the password is known to be right
        if !user.active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        let token = self.credentials.issue_token(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }

    pub async fn get_user(&self, id: i32, include_disabled: bool) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id, include_disabled)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update a user; allowed for the user themself or a holder of `modificar_usuarios`
    pub async fn update_user(&self, actor: &Actor, id: i32, request: UpdateUser) -> AppResult<User> {
        authorize_self_or(actor, id, &[Permission::ModificarUsuarios])
            .or_forbidden("You can only modify your own account")?;

        if let Some(ref email) = request.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email is already registered".to_string()));
            }
        }

        let password_hash = match request.password {
            Some(ref password) => Some(self.credentials.hash_password(password)?),
            None => None,
        };

        let permissions = match request.permisos {
            Some(permissions) if actor.has(Permission::ModificarUsuarios) => Some(permissions),
            Some(_) => {
                tracing::warn!(
                    actor_id = actor.user_id,
                    actor_email = %actor.email,
                    target_id = id,
                    "Ignoring permission change without modificar_usuarios"
                );
                None
            }
            None => None,
        };

        let changes = UserChanges {
            name: request.nombre,
            email: request.email,
            password_hash,
            permissions,
        };

        if changes.is_empty() {
            return self.get_user(id, true).await;
        }

        let user = self
            .repository
            .users
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(actor_id = actor.user_id, actor_email = %actor.email, user_id = id, "User updated");
        Ok(user)
    }

    /// Soft delete a user; allowed for the user themself or a holder of `deshabilitar_usuarios`
    pub async fn disable_user(&self, actor: &Actor, id: i32) -> AppResult<()> {
        authorize_self_or(actor, id, &[Permission::DeshabilitarUsuarios])
            .or_forbidden("You can only disable your own account")?;

        if !self.repository.users.disable(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(actor_id = actor.user_id, actor_email = %actor.email, user_id = id, "User disabled");
        Ok(())
    }

    /// Turn validated token claims into the acting user, rejecting disabled accounts
    pub async fn resolve_actor(&self, claims: &TokenClaims) -> AppResult<Actor> {
        let user = self
            .repository
            .users
            .get_by_id(claims.user_id, false)
            .await?
            .ok_or_else(|| AppError::Authentication("User not found or disabled".to_string()))?;

        Ok(Actor::from(&user))
    }
}
