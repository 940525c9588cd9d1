use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::SessionAPI,
    entities::{LocationInput, Session},
    error::{session_not_found_error, Error},
    view::View,
};

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_session(&self) -> Result<Session, Error> {
        let session = Session::new();

        self.sessions
            .lock()
            .await
            .insert(session.id, session.clone());

        tracing::info!(id = %session.id, "session opened");

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, id: Uuid) -> Result<Session, Error> {
        self.with_session(id, |session| session.clone()).await
    }

    #[tracing::instrument(skip(self))]
    async fn close_session(&self, id: Uuid) -> Result<(), Error> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .ok_or_else(session_not_found_error)?;

        tracing::info!(%id, "session closed");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn update_inputs(
        &self,
        id: Uuid,
        start: Option<LocationInput>,
        end: Option<LocationInput>,
    ) -> Result<Session, Error> {
        self.with_session(id, |session| {
            session.set_inputs(start, end);
            session.clone()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn render_session(&self, id: Uuid) -> Result<View, Error> {
        let map = self.map;

        self.with_session(id, |session| View::render(session, &map))
            .await
    }
}
