//! Capabilities a user can hold

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// Named capability granting access to a gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CrearLibros,
    ModificarLibros,
    DeshabilitarLibros,
    ModificarUsuarios,
    DeshabilitarUsuarios,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::CrearLibros,
        Permission::ModificarLibros,
        Permission::DeshabilitarLibros,
        Permission::ModificarUsuarios,
        Permission::DeshabilitarUsuarios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CrearLibros => "crear_libros",
            Permission::ModificarLibros => "modificar_libros",
            Permission::DeshabilitarLibros => "deshabilitar_libros",
            Permission::ModificarUsuarios => "modificar_usuarios",
            Permission::DeshabilitarUsuarios => "deshabilitar_usuarios",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// Set of permissions held by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from stored strings, dropping names that are not known capabilities
    pub fn from_stored(names: &[String]) -> Self {
        names
            .iter()
            .filter_map(|name| match name.parse::<Permission>() {
                Ok(p) => Some(p),
                Err(_) => {
                    tracing::warn!(permission = %name, "Ignoring unknown stored permission");
                    None
                }
            })
            .collect()
    }

    /// Strings to persist, in a stable order
    pub fn to_stored(&self) -> Vec<String> {
        self.0.iter().map(|p| p.as_str().to_string()).collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when at least one of `required` is held
    pub fn intersects(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.0.contains(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        permissions.into_iter().collect()
    }
}
