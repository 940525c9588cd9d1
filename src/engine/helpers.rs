use super::Engine;

use uuid::Uuid;

use crate::{
    entities::Session,
    error::{session_not_found_error, Error},
};

impl Engine {
    /// Runs `f` against the session under the lock.
    pub(super) async fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Session) -> T + Send,
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(session_not_found_error)?;

        Ok(f(session))
    }

    /// Like `with_session`, but a session closed in the meantime is not an
    /// error: late provider responses for it are simply discarded.
    pub(super) async fn with_live_session<T, F>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut Session) -> T + Send,
    {
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(&id) {
            Some(session) => Some(f(session)),
            None => {
                tracing::debug!(%id, "session closed before response arrived");
                None
            }
        }
    }
}
