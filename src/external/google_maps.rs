use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Directions, Place, Route},
    error::{invalid_input_error, upstream_error, upstream_status_error, Error},
    external::{DirectionsRequest, PlacesProvider, RoutingProvider, TextSearchRequest},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    error_message: Option<String>,
    routes: Option<T>,
    results: Option<T>,
}

/// Client for the Directions and Places web services.
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for GoogleMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMaps")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.google_maps_api_base.clone(),
            api_key: config.google_maps_api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}/maps/api/{}", self.api_base, path)
    }

    fn directions_request(&self, request: DirectionsRequest) -> reqwest::RequestBuilder {
        self.client
            .get(self.url("directions/json"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("origin", request.origin)])
            .query(&[("destination", request.destination)])
            .query(&[("mode", request.travel_mode.as_str())])
    }

    fn text_search_request(&self, request: TextSearchRequest) -> reqwest::RequestBuilder {
        let location: String = request.location.into();

        self.client
            .get(self.url("place/textsearch/json"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("query", request.query)])
            .query(&[("location", location)])
            .query(&[("radius", request.radius)])
    }
}

#[async_trait]
impl RoutingProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn directions(&self, request: DirectionsRequest) -> Result<Directions, Error> {
        let res = self.directions_request(request).send().await?;

        check_status_code(res.status().as_u16())?;

        let data: Response<Vec<Route>> = res.json().await?;

        parse_directions(data)
    }
}

#[async_trait]
impl PlacesProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn text_search(&self, request: TextSearchRequest) -> Result<Vec<Place>, Error> {
        let res = self.text_search_request(request).send().await?;

        check_status_code(res.status().as_u16())?;

        let data: Response<Vec<Place>> = res.json().await?;

        parse_places(data)
    }
}

fn check_status_code(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

fn check_status<T>(data: &Response<T>) -> Result<(), Error> {
    if data.status != "OK" {
        if let Some(message) = &data.error_message {
            tracing::warn!(status = %data.status, %message, "google maps request failed");
        }

        return Err(upstream_status_error(&data.status));
    }

    Ok(())
}

fn parse_directions(data: Response<Vec<Route>>) -> Result<Directions, Error> {
    check_status(&data)?;

    let directions = Directions {
        routes: data.routes.unwrap_or_default(),
    };

    // a route the places search cannot anchor to is no route at all
    if directions.destination().is_none() {
        return Err(upstream_status_error("ZERO_RESULTS"));
    }

    Ok(directions)
}

fn parse_places(data: Response<Vec<Place>>) -> Result<Vec<Place>, Error> {
    check_status(&data)?;

    Ok(data.results.unwrap_or_default())
}

#[test]
fn parse_directions_test() {
    use crate::entities::Coordinates;

    let data: Response<Vec<Route>> = serde_json::from_str(
        r#"{
            "status": "OK",
            "geocoded_waypoints": [],
            "routes": [{
                "summary": "I-80 E",
                "overview_polyline": { "points": "abc" },
                "legs": [{
                    "start_address": "San Francisco, CA, USA",
                    "end_address": "Oakland, CA, USA",
                    "start_location": { "lat": 37.7749, "lng": -122.4194 },
                    "end_location": { "lat": 37.8044, "lng": -122.2712 },
                    "distance": { "text": "19.4 km", "value": 19400 },
                    "duration": { "text": "20 mins", "value": 1200 },
                    "steps": []
                }]
            }]
        }"#,
    )
    .unwrap();

    let directions = parse_directions(data).unwrap();
    assert_eq!(
        directions.destination(),
        Some(Coordinates::new(37.8044, -122.2712))
    );
    assert_eq!(directions.routes[0].summary, "I-80 E");
}

#[test]
fn parse_directions_without_routes_test() {
    let data: Response<Vec<Route>> =
        serde_json::from_str(r#"{ "status": "ZERO_RESULTS", "routes": [] }"#).unwrap();
    assert_eq!(parse_directions(data).unwrap_err().message, "ZERO_RESULTS");

    let data: Response<Vec<Route>> =
        serde_json::from_str(r#"{ "status": "OK", "routes": [] }"#).unwrap();
    assert_eq!(parse_directions(data).unwrap_err().message, "ZERO_RESULTS");
}

#[test]
fn parse_places_test() {
    let data: Response<Vec<Place>> = serde_json::from_str(
        r#"{
            "status": "OK",
            "html_attributions": [],
            "results": [{
                "place_id": "ChIJ1",
                "name": "Highland Hospital",
                "formatted_address": "1411 E 31st St, Oakland, CA 94602",
                "geometry": { "location": { "lat": 37.7989, "lng": -122.2316 } },
                "rating": 3.1
            }]
        }"#,
    )
    .unwrap();

    let places = parse_places(data).unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Highland Hospital");
}

#[test]
fn non_ok_places_status_is_an_error_test() {
    for status in ["ZERO_RESULTS", "OVER_QUERY_LIMIT", "REQUEST_DENIED"] {
        let data: Response<Vec<Place>> = serde_json::from_value(serde_json::json!({
            "status": status,
            "error_message": "nope",
            "results": [],
        }))
        .unwrap();

        let err = parse_places(data).unwrap_err();
        assert_eq!(err.code, 4);
        assert_eq!(err.message, status);
    }
}

#[test]
fn status_code_mapping_test() {
    assert!(check_status_code(200).is_ok());
    assert_eq!(check_status_code(403).unwrap_err().code, 101);
    assert_eq!(check_status_code(503).unwrap_err().code, 4);
}

#[cfg(test)]
fn client_for(api_base: &str, api_key: &str) -> GoogleMaps {
    GoogleMaps {
        client: reqwest::Client::new(),
        api_base: api_base.into(),
        api_key: api_key.into(),
    }
}

#[test]
fn text_search_query_test() {
    use crate::entities::{Coordinates, SEARCH_RADIUS_METERS};

    let request = client_for("maps.googleapis.com", "k")
        .text_search_request(TextSearchRequest {
            query: "hospital".into(),
            location: Coordinates::new(2.0, 2.5),
            radius: SEARCH_RADIUS_METERS,
        })
        .build()
        .unwrap();

    assert_eq!(request.url().path(), "/maps/api/place/textsearch/json");
    assert_eq!(
        request.url().query(),
        Some("key=k&query=hospital&location=2%2C2.5&radius=5000")
    );
}

#[test]
fn directions_query_test() {
    use crate::external::TravelMode;

    let request = client_for("maps.googleapis.com", "k")
        .directions_request(DirectionsRequest {
            origin: "1,1".into(),
            destination: "2,2".into(),
            travel_mode: TravelMode::Driving,
        })
        .build()
        .unwrap();

    assert_eq!(request.url().path(), "/maps/api/directions/json");
    assert_eq!(
        request.url().query(),
        Some("key=k&origin=1%2C1&destination=2%2C2&mode=driving")
    );
}

#[test]
fn transport_errors_do_not_expose_the_key_test() {
    use crate::api::{DirectionsAPI, SessionAPI};
    use crate::config::MapSettings;
    use crate::engine::Engine;

    // nothing listens on port 1
    let engine = Engine::new(client_for("127.0.0.1:1", "SUPERSECRETKEY"), MapSettings::default());

    let session = tokio_test::block_on(async {
        let session = engine.create_session().await.unwrap();
        engine
            .request_directions(session.id, "1,1".into(), "2,2".into())
            .await
            .unwrap()
    });

    let error = session.error.clone().unwrap();
    assert!(error.message.starts_with("Failed to get directions: reqwest error"));

    let json = serde_json::to_string(&session).unwrap();
    assert!(!json.contains("SUPERSECRETKEY"));
    assert!(!json.contains("key="));
}
