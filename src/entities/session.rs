use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{Category, Coordinates, Directions, LocationInput, Place};
use crate::error::Error;
use crate::external::{DirectionsRequest, TextSearchRequest, TravelMode};

/// Places are searched within this distance of the route destination.
pub const SEARCH_RADIUS_METERS: u32 = 5000;

pub type RequestId = u64;

#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub start: LocationInput,
    pub end: LocationInput,
    pub category: Category,
    pub directions: Option<Directions>,
    pub places: Vec<Place>,
    pub error: Option<SessionError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    route_revision: u64,
    #[serde(skip)]
    route_requests: Requests,
    #[serde(skip)]
    places_requests: Requests,
    #[serde(skip)]
    places_fetched_for: Option<(u64, Category)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Routing,
    Places,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Requesting,
    Ready,
}

/// Tracks the newest request of one kind. Only the response to `latest`
/// may touch session state.
#[derive(Clone, Copy, Debug, Default)]
struct Requests {
    latest: RequestId,
    pending: bool,
}

impl Requests {
    fn next(&mut self) -> RequestId {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    fn supersede(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    fn settle(&mut self, id: RequestId) -> bool {
        if id != self.latest {
            return false;
        }

        self.pending = false;
        true
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            start: LocationInput::default(),
            end: LocationInput::default(),
            category: Category::default(),
            directions: None,
            places: vec![],
            error: None,
            created_at: now,
            updated_at: now,
            route_revision: 0,
            route_requests: Requests::default(),
            places_requests: Requests::default(),
            places_fetched_for: None,
        }
    }

    pub fn status(&self) -> Status {
        if self.route_requests.pending || self.places_requests.pending {
            return Status::Requesting;
        }

        if self.directions.is_some() || self.error.is_some() {
            return Status::Ready;
        }

        Status::Idle
    }

    /// Whether nothing has happened to the session since `cutoff` and no
    /// provider call is in flight for it.
    pub fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.status() != Status::Requesting && self.updated_at < cutoff
    }

    pub fn set_inputs(&mut self, start: Option<LocationInput>, end: Option<LocationInput>) {
        if let Some(start) = start {
            self.start = start;
        }

        if let Some(end) = end {
            self.end = end;
        }

        self.touch();
    }

    /// Returns whether the category actually changed.
    pub fn select_category(&mut self, category: Category) -> bool {
        if self.category == category {
            return false;
        }

        self.category = category;
        self.touch();
        true
    }

    /// Validates the current inputs and opens a new route request.
    ///
    /// Returns `None` when an input does not parse; the validation error is
    /// recorded and any older in-flight route request becomes stale.
    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub fn begin_route_request(&mut self) -> Option<(RequestId, DirectionsRequest)> {
        self.touch();

        let origin = match parse_input("start", &self.start) {
            Ok(origin) => origin,
            Err(message) => return self.reject_route_request(message),
        };

        let destination = match parse_input("end", &self.end) {
            Ok(destination) => destination,
            Err(message) => return self.reject_route_request(message),
        };

        let request = DirectionsRequest {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: TravelMode::Driving,
        };

        Some((self.route_requests.next(), request))
    }

    /// Applies a routing response. Returns `true` when the stored route
    /// changed, which is the signal to fetch places again.
    #[tracing::instrument(skip(self, result), fields(session_id = %self.id))]
    pub fn complete_route_request(
        &mut self,
        id: RequestId,
        result: Result<Directions, Error>,
    ) -> bool {
        if !self.route_requests.settle(id) {
            tracing::debug!(latest = self.route_requests.latest, "dropping stale route response");
            return false;
        }

        self.touch();

        match result {
            Ok(directions) => {
                self.directions = Some(directions);
                self.route_revision += 1;
                self.clear_error(&[ErrorKind::Routing, ErrorKind::Validation]);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to get directions");
                self.error = Some(SessionError {
                    kind: ErrorKind::Routing,
                    message: format!("Failed to get directions: {}", err),
                });
                false
            }
        }
    }

    /// Opens a places request for the current (route, category) pair, once
    /// per distinct pair and only when the route has a destination.
    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub fn begin_places_request(&mut self) -> Option<(RequestId, TextSearchRequest)> {
        let destination = self.destination()?;
        let key = (self.route_revision, self.category);

        if self.places_fetched_for == Some(key) {
            return None;
        }

        self.places_fetched_for = Some(key);
        self.touch();

        let request = TextSearchRequest {
            query: self.category.query().into(),
            location: destination,
            radius: SEARCH_RADIUS_METERS,
        };

        Some((self.places_requests.next(), request))
    }

    #[tracing::instrument(skip(self, result), fields(session_id = %self.id))]
    pub fn complete_places_request(&mut self, id: RequestId, result: Result<Vec<Place>, Error>) {
        if !self.places_requests.settle(id) {
            tracing::debug!(latest = self.places_requests.latest, "dropping stale places response");
            return;
        }

        self.touch();

        match result {
            Ok(places) => {
                tracing::info!(count = places.len(), "fetched places");
                self.places = places;
                self.clear_error(&[ErrorKind::Places]);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to get places");
                self.error = Some(SessionError {
                    kind: ErrorKind::Places,
                    message: format!("Failed to get places: {}", err),
                });
            }
        }
    }

    pub fn destination(&self) -> Option<Coordinates> {
        self.directions.as_ref().and_then(|d| d.destination())
    }

    fn reject_route_request(&mut self, message: String) -> Option<(RequestId, DirectionsRequest)> {
        tracing::info!(%message, "rejecting route request");

        self.route_requests.supersede();
        self.error = Some(SessionError {
            kind: ErrorKind::Validation,
            message,
        });

        None
    }

    fn clear_error(&mut self, kinds: &[ErrorKind]) {
        if let Some(error) = &self.error {
            if kinds.contains(&error.kind) {
                self.error = None;
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_input(name: &str, input: &LocationInput) -> Result<Coordinates, String> {
    match input.coordinates() {
        Some(Ok(coordinates)) => Ok(coordinates),
        Some(Err(err)) => Err(format!("Invalid {} location: {}", name, err)),
        None => Err(format!("Invalid {} location: location is required", name)),
    }
}

#[cfg(test)]
fn session_with_inputs(start: &str, end: &str) -> Session {
    let mut session = Session::new();
    session.set_inputs(Some(start.into()), Some(end.into()));
    session
}

#[test]
fn route_request_uses_normalized_inputs_test() {
    let mut session = session_with_inputs("37.7749, -122.4194", "37.8044,-122.2712");

    let (id, request) = session.begin_route_request().unwrap();
    assert_eq!(id, 1);
    assert_eq!(request.origin, "37.7749,-122.4194");
    assert_eq!(request.destination, "37.8044,-122.2712");
    assert_eq!(request.travel_mode, TravelMode::Driving);
    assert_eq!(session.status(), Status::Requesting);
}

#[test]
fn malformed_input_records_validation_error_test() {
    let mut session = session_with_inputs("1,1", "somewhere");

    assert!(session.begin_route_request().is_none());

    let error = session.error.clone().unwrap();
    assert_eq!(error.kind, ErrorKind::Validation);
    assert!(error.message.starts_with("Invalid end location"));
    assert_eq!(session.status(), Status::Ready);
}

#[test]
fn stale_route_response_is_dropped_test() {
    let mut session = session_with_inputs("1,1", "2,2");
    let (first, _) = session.begin_route_request().unwrap();

    session.set_inputs(None, Some("3,3".into()));
    let (second, _) = session.begin_route_request().unwrap();

    let newer = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(3.0, 3.0));
    let older = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));

    assert!(session.complete_route_request(second, Ok(newer)));
    assert!(!session.complete_route_request(first, Ok(older)));
    assert_eq!(session.destination(), Some(Coordinates::new(3.0, 3.0)));
}

#[test]
fn routing_failure_keeps_previous_route_test() {
    let mut session = session_with_inputs("1,1", "2,2");
    let (id, _) = session.begin_route_request().unwrap();
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    assert!(session.complete_route_request(id, Ok(directions.clone())));

    let (id, _) = session.begin_route_request().unwrap();
    let changed = session.complete_route_request(id, Err(crate::error::upstream_status_error("NOT_FOUND")));

    assert!(!changed);
    assert_eq!(session.directions, Some(directions));
    assert_eq!(
        session.error.unwrap().message,
        "Failed to get directions: NOT_FOUND"
    );
}

#[test]
fn places_run_once_per_route_and_category_test() {
    let mut session = session_with_inputs("1,1", "2,2");
    assert!(session.begin_places_request().is_none());

    let (id, _) = session.begin_route_request().unwrap();
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    session.complete_route_request(id, Ok(directions));

    let (_, request) = session.begin_places_request().unwrap();
    assert_eq!(request.query, "hospital");
    assert_eq!(request.location, Coordinates::new(2.0, 2.0));
    assert_eq!(request.radius, 5000);
    assert!(session.begin_places_request().is_none());

    assert!(!session.select_category(Category::Hospital));
    assert!(session.select_category(Category::Supermarket));
    let (_, request) = session.begin_places_request().unwrap();
    assert_eq!(request.query, "supermarket");
    assert_eq!(request.location, Coordinates::new(2.0, 2.0));
}

#[test]
fn places_failure_keeps_previous_list_test() {
    let mut session = session_with_inputs("1,1", "2,2");
    let (id, _) = session.begin_route_request().unwrap();
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    session.complete_route_request(id, Ok(directions));

    let (id, _) = session.begin_places_request().unwrap();
    let places = vec![Place::new("General", "1 Main St", Coordinates::new(2.0, 2.0))];
    session.complete_places_request(id, Ok(places.clone()));

    session.select_category(Category::Restaurant);
    let (id, _) = session.begin_places_request().unwrap();
    session.complete_places_request(id, Err(crate::error::upstream_status_error("ZERO_RESULTS")));

    assert_eq!(session.places, places);
    assert_eq!(
        session.error.clone().unwrap().message,
        "Failed to get places: ZERO_RESULTS"
    );

    // a successful route does not clear a places error by itself
    let (id, _) = session.begin_route_request().unwrap();
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    session.complete_route_request(id, Ok(directions));
    assert_eq!(session.error.clone().unwrap().kind, ErrorKind::Places);

    let (id, _) = session.begin_places_request().unwrap();
    session.complete_places_request(id, Ok(vec![]));
    assert!(session.places.is_empty());
    assert!(session.error.is_none());
}

#[test]
fn in_flight_session_is_never_idle_test() {
    let mut session = session_with_inputs("1,1", "2,2");
    let later = Utc::now() + chrono::Duration::seconds(1);

    assert!(session.idle_since(later));

    session.begin_route_request().unwrap();
    assert!(!session.idle_since(later));
}
