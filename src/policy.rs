//! Authorization decisions
//!
//! Everything here is pure: callers resolve the acting user first and then ask
//! whether a set of permissions, optionally combined with ownership, allows an action.

use crate::{
    error::AppError,
    models::{
        book::UpdateBook,
        permission::{Permission, PermissionSet},
        user::User,
    },
};

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// Turn a denial into an authorization error carrying `message`
    pub fn or_forbidden(self, message: &str) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Authorization(message.to_string())),
        }
    }
}

/// Identity and capabilities of the authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub email: String,
    pub permissions: PermissionSet,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor {
            user_id: user.id,
            email: user.email.clone(),
            permissions: user.permissions.clone(),
        }
    }
}

impl Actor {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Require any of `required`
    pub fn require(&self, required: &[Permission]) -> Result<(), AppError> {
        authorize(&self.permissions, required)
            .or_forbidden("You do not have permission to perform this action")
    }
}

/// Allow iff `held` contains at least one of `required`
pub fn authorize(held: &PermissionSet, required: &[Permission]) -> Decision {
    if held.intersects(required) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Allow the owner of `target_user_id`, or anyone holding one of `required`
pub fn authorize_self_or(actor: &Actor, target_user_id: i32, required: &[Permission]) -> Decision {
    if actor.user_id == target_user_id {
        Decision::Allow
    } else {
        authorize(&actor.permissions, required)
    }
}

/// Changing catalogue fields needs `modificar_libros`; availability alone needs nothing
pub fn authorize_book_update(actor: &Actor, changes: &UpdateBook) -> Decision {
    if changes.touches_catalog_fields() {
        authorize(&actor.permissions, &[Permission::ModificarLibros])
    } else {
        Decision::Allow
    }
}
