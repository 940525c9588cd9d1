use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{DirectionsAPI, SessionAPI},
    entities::{LocationInput, Session},
    error::Error,
};

#[async_trait]
impl DirectionsAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn request_directions(
        &self,
        id: Uuid,
        start: LocationInput,
        end: LocationInput,
    ) -> Result<Session, Error> {
        let maybe_request = self
            .with_session(id, |session| {
                session.set_inputs(Some(start), Some(end));
                session.begin_route_request()
            })
            .await?;

        let (request_id, request) = match maybe_request {
            Some(request) => request,
            None => return self.find_session(id).await,
        };

        tracing::info!(request_id, "requesting directions");
        let result = self.routing.directions(request).await;

        let route_changed = self
            .with_live_session(id, |session| {
                session.complete_route_request(request_id, result)
            })
            .await
            .unwrap_or(false);

        if route_changed {
            self.fetch_places(id).await;
        }

        self.find_session(id).await
    }
}
