use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Category, LocationInput, Session};
use crate::error::Error;
use crate::view::View;

#[async_trait]
pub trait SessionAPI {
    async fn create_session(&self) -> Result<Session, Error>;
    async fn find_session(&self, id: Uuid) -> Result<Session, Error>;
    async fn close_session(&self, id: Uuid) -> Result<(), Error>;
    async fn update_inputs(
        &self,
        id: Uuid,
        start: Option<LocationInput>,
        end: Option<LocationInput>,
    ) -> Result<Session, Error>;
    async fn render_session(&self, id: Uuid) -> Result<View, Error>;
}

#[async_trait]
pub trait DirectionsAPI {
    async fn request_directions(
        &self,
        id: Uuid,
        start: LocationInput,
        end: LocationInput,
    ) -> Result<Session, Error>;
}

#[async_trait]
pub trait PlacesAPI {
    async fn select_category(&self, id: Uuid, category: Category) -> Result<Session, Error>;
}

pub trait API: SessionAPI + DirectionsAPI + PlacesAPI {}
