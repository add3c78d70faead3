//! Business logic services

pub mod catalog;
pub mod credentials;
pub mod reservations;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    repository::{Repository, StoreHealth},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub credentials: credentials::CredentialService,
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub reservations: reservations::ReservationsService,
    pub health: Arc<dyn StoreHealth>,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let credentials = credentials::CredentialService::new(auth_config);

        Self {
            users: users::UsersService::new(repository.clone(), credentials.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            health: repository.health,
            credentials,
        }
    }
}
