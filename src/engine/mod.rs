mod directions_api;
mod eviction;
mod helpers;
mod places_api;
mod session_api;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub use eviction::spawn_sweeper;

use crate::{
    api::API,
    config::MapSettings,
    entities::Session,
    external::{PlacesProvider, RoutingProvider},
};

pub type DynRouting = Arc<dyn RoutingProvider + Send + Sync>;
pub type DynPlaces = Arc<dyn PlacesProvider + Send + Sync>;

/// Owns every live session and the providers that feed them.
///
/// The session lock is never held while a provider call is in flight.
pub struct Engine {
    sessions: Mutex<HashMap<Uuid, Session>>,
    routing: DynRouting,
    places: DynPlaces,
    map: MapSettings,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new<P>(provider: P, map: MapSettings) -> Self
    where
        P: RoutingProvider + PlacesProvider + Send + Sync + 'static,
    {
        let provider = Arc::new(provider);

        Self::with_providers(provider.clone(), provider, map)
    }

    pub fn with_providers(routing: DynRouting, places: DynPlaces, map: MapSettings) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            routing,
            places,
            map,
        }
    }
}

impl API for Engine {}

#[cfg(test)]
mod tests;
