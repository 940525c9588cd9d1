pub mod google_maps;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Directions, Place};
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    pub travel_mode: TravelMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSearchRequest {
    pub query: String,
    pub location: Coordinates,
    pub radius: u32,
}

#[async_trait]
pub trait RoutingProvider {
    async fn directions(&self, request: DirectionsRequest) -> Result<Directions, Error>;
}

#[async_trait]
pub trait PlacesProvider {
    async fn text_search(&self, request: TextSearchRequest) -> Result<Vec<Place>, Error>;
}
