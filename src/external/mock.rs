//! Scripted providers for driving the engine in tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::{
    entities::{Directions, Place},
    error::{upstream_status_error, Error},
    external::{DirectionsRequest, PlacesProvider, RoutingProvider, TextSearchRequest},
};

struct Reply<T> {
    result: Result<T, Error>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Answers calls in order with queued replies and records every request.
/// A gated reply is held back until its sender fires.
pub struct Scripted<Req, T> {
    replies: Mutex<VecDeque<Reply<T>>>,
    requests: Mutex<Vec<Req>>,
}

impl<Req: Clone, T> Scripted<Req, T> {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn reply(self, result: Result<T, Error>) -> Self {
        self.replies.lock().unwrap().push_back(Reply { result, gate: None });
        self
    }

    pub fn gated_reply(self, result: Result<T, Error>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply {
            result,
            gate: Some(rx),
        });
        (self, tx)
    }

    pub fn requests(&self) -> Vec<Req> {
        self.requests.lock().unwrap().clone()
    }

    async fn answer(&self, request: Req) -> Result<T, Error> {
        self.requests.lock().unwrap().push(request);

        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply { result, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Err(upstream_status_error("UNSCRIPTED")),
        }
    }
}

pub type MockRouting = Scripted<DirectionsRequest, Directions>;
pub type MockPlaces = Scripted<TextSearchRequest, Vec<Place>>;

#[async_trait]
impl RoutingProvider for MockRouting {
    async fn directions(&self, request: DirectionsRequest) -> Result<Directions, Error> {
        self.answer(request).await
    }
}

#[async_trait]
impl PlacesProvider for MockPlaces {
    async fn text_search(&self, request: TextSearchRequest) -> Result<Vec<Place>, Error> {
        self.answer(request).await
    }
}
