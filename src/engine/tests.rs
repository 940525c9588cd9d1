use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_test::block_on;

use super::Engine;
use crate::{
    api::{DirectionsAPI, PlacesAPI, SessionAPI},
    config::MapSettings,
    entities::{Category, Coordinates, Directions, ErrorKind, Place},
    error::upstream_status_error,
    external::mock::{MockPlaces, MockRouting},
};

fn engine(routing: &Arc<MockRouting>, places: &Arc<MockPlaces>) -> Engine {
    Engine::with_providers(routing.clone(), places.clone(), MapSettings::default())
}

fn route_to(lat: f64, lng: f64) -> Directions {
    Directions::ending_at(Coordinates::new(0.0, 0.0), Coordinates::new(lat, lng))
}

fn two_places() -> Vec<Place> {
    vec![
        Place::new("Nopalito", "306 Broderick St", Coordinates::new(2.01, 2.0)),
        Place::new("Zuni Cafe", "1658 Market St", Coordinates::new(2.0, 2.01)),
    ]
}

#[test]
fn directions_then_places_test() {
    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(37.8044, -122.2712))));
    let places = Arc::new(MockPlaces::new().reply(Ok(two_places())));
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "37.7749,-122.4194".into(), "37.8044,-122.2712".into())
            .await
            .unwrap()
    });

    assert!(session.directions.is_some());

    let requests = routing.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].origin, "37.7749,-122.4194");
    assert_eq!(requests[0].destination, "37.8044,-122.2712");

    let requests = places.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "hospital");
    assert_eq!(requests[0].location, Coordinates::new(37.8044, -122.2712));
    assert_eq!(requests[0].radius, 5000);
}

#[test]
fn end_to_end_restaurants_test() {
    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(2.0, 2.0))));
    let places = Arc::new(MockPlaces::new().reply(Ok(two_places())));
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        // no route yet, so picking a category searches nothing
        engine
            .select_category(session.id, Category::Restaurant)
            .await
            .unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap()
    });

    assert_eq!(session.places.len(), 2);
    assert!(session.error.is_none());

    let requests = places.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "restaurant");
    assert_eq!(requests[0].location, Coordinates::new(2.0, 2.0));
}

#[test]
fn category_change_triggers_one_search_test() {
    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(2.0, 2.0))));
    let places = Arc::new(
        MockPlaces::new()
            .reply(Ok(two_places()))
            .reply(Ok(vec![])),
    );
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap();
        engine
            .select_category(session.id, Category::Supermarket)
            .await
            .unwrap();
        // re-selecting the same category is not a change
        engine
            .select_category(session.id, Category::Supermarket)
            .await
            .unwrap()
    });

    let requests = places.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query, "supermarket");
    assert_eq!(requests[1].location, requests[0].location);

    assert!(session.places.is_empty());
    assert_eq!(routing.requests().len(), 1);
}

#[test]
fn places_failure_keeps_list_test() {
    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(2.0, 2.0))));
    let places = Arc::new(
        MockPlaces::new()
            .reply(Ok(two_places()))
            .reply(Err(upstream_status_error("ZERO_RESULTS"))),
    );
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap();
        engine
            .select_category(session.id, Category::Restaurant)
            .await
            .unwrap()
    });

    assert_eq!(session.places, two_places());

    let error = session.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Places);
    assert_eq!(error.message, "Failed to get places: ZERO_RESULTS");
}

#[test]
fn routing_failure_skips_places_test() {
    let routing = Arc::new(MockRouting::new().reply(Err(upstream_status_error("NOT_FOUND"))));
    let places = Arc::new(MockPlaces::new());
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap()
    });

    assert!(session.directions.is_none());
    assert!(places.requests().is_empty());
    assert_eq!(
        session.error.unwrap().message,
        "Failed to get directions: NOT_FOUND"
    );
}

#[test]
fn malformed_input_never_reaches_provider_test() {
    let routing = Arc::new(MockRouting::new());
    let places = Arc::new(MockPlaces::new());
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "".into())
            .await
            .unwrap()
    });

    assert!(routing.requests().is_empty());
    assert!(places.requests().is_empty());

    let error = session.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Validation);
    assert_eq!(error.message, "Invalid end location: location is required");
}

#[test]
fn stale_route_response_does_not_win_test() {
    let (routing, release_slow) = MockRouting::new().gated_reply(Ok(route_to(5.0, 5.0)));
    let routing = Arc::new(routing.reply(Ok(route_to(2.0, 2.0))));
    let places = Arc::new(MockPlaces::new().reply(Ok(two_places())));
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        let id = session.id;

        let slow = engine.request_directions(id, "1,1".into(), "5,5".into());
        let fast = async {
            let session = engine
                .request_directions(id, "1,1".into(), "2,2".into())
                .await
                .unwrap();
            release_slow.send(()).unwrap();
            session
        };

        let (slow, fast) = futures::join!(slow, fast);
        slow.unwrap();
        assert_eq!(fast.destination(), Some(Coordinates::new(2.0, 2.0)));

        engine.find_session(id).await.unwrap()
    });

    assert_eq!(session.destination(), Some(Coordinates::new(2.0, 2.0)));
    assert_eq!(session.end.as_str(), "2,2");
    assert_eq!(places.requests().len(), 1);
    assert_eq!(session.places.len(), 2);
}

#[test]
fn closed_session_is_gone_test() {
    let routing = Arc::new(MockRouting::new());
    let places = Arc::new(MockPlaces::new());
    let engine = engine(&routing, &places);

    block_on(async {
        let session = engine.create_session().await.unwrap();
        engine.close_session(session.id).await.unwrap();

        let err = engine.find_session(session.id).await.unwrap_err();
        assert_eq!(err.code, 102);

        let err = engine.close_session(session.id).await.unwrap_err();
        assert_eq!(err.code, 102);
    });
}

#[test]
fn render_session_test() {
    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(2.0, 2.0))));
    let places = Arc::new(MockPlaces::new().reply(Ok(two_places())));
    let engine = engine(&routing, &places);

    let view = block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .update_inputs(session.id, Some("1,1".into()), None)
            .await
            .unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap();
        engine.render_session(session.id).await.unwrap()
    });

    assert_eq!(view.map.markers.len(), 4);
    assert_eq!(view.places.items.len(), 2);
    assert!(view.error.is_none());
}

#[test]
fn stale_places_response_does_not_win_test() {
    let restaurants = vec![Place::new("Nopalito", "306 Broderick St", Coordinates::new(2.01, 2.0))];

    let routing = Arc::new(MockRouting::new().reply(Ok(route_to(2.0, 2.0))));
    let (places, release_hospitals) = MockPlaces::new().gated_reply(Ok(two_places()));
    let places = Arc::new(places.reply(Ok(restaurants.clone())));
    let engine = engine(&routing, &places);

    let session = block_on(async {
        let session = engine.create_session().await.unwrap();
        let id = session.id;

        // parks on the hospital search
        let directions = engine.request_directions(id, "1,1".into(), "2,2".into());
        let switch = async {
            let session = engine
                .select_category(id, Category::Restaurant)
                .await
                .unwrap();
            release_hospitals.send(()).unwrap();
            session
        };

        let (directions, switched) = futures::join!(directions, switch);
        directions.unwrap();
        assert_eq!(switched.places, restaurants);

        engine.find_session(id).await.unwrap()
    });

    let requests = places.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query, "hospital");
    assert_eq!(requests[1].query, "restaurant");

    assert_eq!(session.category, Category::Restaurant);
    assert_eq!(session.places, restaurants);
    assert!(session.error.is_none());
}

#[test]
fn session_closed_during_route_request_test() {
    let (routing, release_route) = MockRouting::new().gated_reply(Ok(route_to(2.0, 2.0)));
    let routing = Arc::new(routing);
    let places = Arc::new(MockPlaces::new().reply(Ok(two_places())));
    let engine = engine(&routing, &places);

    block_on(async {
        let session = engine.create_session().await.unwrap();
        let id = session.id;

        let directions = engine.request_directions(id, "1,1".into(), "2,2".into());
        let close = async {
            engine.close_session(id).await.unwrap();
            release_route.send(()).unwrap();
        };

        let (directions, _) = futures::join!(directions, close);
        assert_eq!(directions.unwrap_err().code, 102);

        assert_eq!(engine.find_session(id).await.unwrap_err().code, 102);
    });

    assert_eq!(routing.requests().len(), 1);
    assert!(places.requests().is_empty());
}

#[test]
fn evict_idle_sessions_test() {
    let routing = Arc::new(MockRouting::new());
    let places = Arc::new(MockPlaces::new());
    let engine = engine(&routing, &places);

    block_on(async {
        let idle = engine.create_session().await.unwrap();
        let active = engine.create_session().await.unwrap();

        engine
            .sessions
            .lock()
            .await
            .get_mut(&idle.id)
            .unwrap()
            .updated_at = Utc::now() - Duration::hours(2);

        assert_eq!(engine.evict_idle(Duration::minutes(30)).await, 1);
        assert_eq!(engine.evict_idle(Duration::minutes(30)).await, 0);

        assert_eq!(engine.find_session(idle.id).await.unwrap_err().code, 102);
        assert!(engine.find_session(active.id).await.is_ok());
    });
}
