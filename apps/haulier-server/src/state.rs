//! Application state.

use std::sync::Arc;

use auth::JwtManager;
use geocoding::Geocoder;
use resource_store::{LocationStore, OrderStore, TruckStore, UserStore};

use crate::config::Config;
use crate::services::{AuthService, LocationService, OrderService, TruckService, UserService};

/// Store handles shared by the services.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub trucks: Arc<dyn TruckStore>,
    pub locations: Arc<dyn LocationStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    /// Uses one backend for every resource.
    pub fn from_backend<S>(store: S) -> Self
    where
        S: UserStore + TruckStore + LocationStore + OrderStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            trucks: store.clone(),
            locations: store.clone(),
            orders: store,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// JWT manager used by the bearer middleware.
    pub jwt_manager: Arc<JwtManager>,
    pub auth: AuthService,
    pub users: UserService,
    pub trucks: TruckService,
    pub locations: LocationService,
    pub orders: OrderService,
}

impl AppState {
    /// Wires every service to its store handles.
    pub fn new(
        config: Config,
        jwt_manager: JwtManager,
        stores: Stores,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let jwt_manager = Arc::new(jwt_manager);

        Self {
            config,
            auth: AuthService::new(stores.users.clone(), jwt_manager.clone()),
            users: UserService::new(stores.users.clone()),
            trucks: TruckService::new(stores.trucks.clone(), stores.users.clone()),
            locations: LocationService::new(stores.locations.clone(), geocoder),
            orders: OrderService::new(stores),
            jwt_manager,
        }
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<AppState>;
