use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{PlacesAPI, SessionAPI},
    entities::{Category, Session},
    error::Error,
};

#[async_trait]
impl PlacesAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn select_category(&self, id: Uuid, category: Category) -> Result<Session, Error> {
        let changed = self
            .with_session(id, |session| session.select_category(category))
            .await?;

        if changed {
            self.fetch_places(id).await;
        }

        self.find_session(id).await
    }
}

impl Engine {
    /// Searches places around the current route destination if the
    /// session's (route, category) pair has not been searched yet.
    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_places(&self, id: Uuid) {
        let maybe_request = self
            .with_live_session(id, |session| session.begin_places_request())
            .await
            .flatten();

        let (request_id, request) = match maybe_request {
            Some(request) => request,
            None => return,
        };

        tracing::info!(request_id, query = %request.query, "searching places");
        let result = self.places.text_search(request).await;

        self.with_live_session(id, |session| {
            session.complete_places_request(request_id, result);
        })
        .await;
    }
}
