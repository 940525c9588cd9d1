//! Render model for a session: everything a front end needs to draw the
//! inputs, the map with its overlays and the place list.

use serde::Serialize;

use crate::config::MapSettings;
use crate::entities::{Category, Coordinates, LocationInput, Session, Status};

pub const TITLE: &str = "Route with Places Filter";
pub const EMPTY_PLACES_TEXT: &str = "No places found.";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct View {
    pub title: &'static str,
    pub status: Status,
    pub controls: Controls,
    pub map: MapView,
    pub error: Option<String>,
    pub places: PlaceList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Controls {
    pub start: TextInput,
    pub end: TextInput,
    pub submit_label: &'static str,
    pub category: Dropdown,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextInput {
    pub placeholder: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dropdown {
    pub selected: Category,
    pub options: Vec<DropdownOption>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DropdownOption {
    pub value: Category,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub route: Option<RouteOverlay>,
    pub markers: Vec<Marker>,
}

/// Drawn without the provider's own start/end markers; the endpoint
/// markers come from the inputs instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub polylines: Vec<String>,
    pub suppress_markers: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Start,
    End,
    Place,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceList {
    pub heading: &'static str,
    pub items: Vec<PlaceItem>,
    pub empty_text: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceItem {
    pub name: String,
    pub vicinity: String,
}

pub fn category_options() -> Vec<DropdownOption> {
    Category::ALL
        .iter()
        .map(|&category| DropdownOption {
            value: category,
            label: category.label(),
        })
        .collect()
}

impl View {
    pub fn render(session: &Session, map: &MapSettings) -> Self {
        let start = parsed(&session.start);
        let end = parsed(&session.end);

        let mut markers = vec![];

        if let Some(position) = start {
            markers.push(Marker {
                kind: MarkerKind::Start,
                position,
                title: None,
            });
        }

        if let Some(position) = end {
            markers.push(Marker {
                kind: MarkerKind::End,
                position,
                title: None,
            });
        }

        markers.extend(session.places.iter().map(|place| Marker {
            kind: MarkerKind::Place,
            position: place.location(),
            title: Some(place.name.clone()),
        }));

        let route = session.directions.as_ref().map(|directions| RouteOverlay {
            polylines: directions
                .routes
                .iter()
                .filter_map(|route| route.overview_polyline.as_ref())
                .map(|polyline| polyline.points.clone())
                .collect(),
            suppress_markers: true,
        });

        let items: Vec<PlaceItem> = session
            .places
            .iter()
            .map(|place| PlaceItem {
                name: place.name.clone(),
                vicinity: place.display_vicinity().into(),
            })
            .collect();

        let empty_text = match items.is_empty() {
            true => Some(EMPTY_PLACES_TEXT),
            false => None,
        };

        Self {
            title: TITLE,
            status: session.status(),
            controls: Controls {
                start: TextInput {
                    placeholder: "Start Location (lat,lng)",
                    value: session.start.as_str().into(),
                },
                end: TextInput {
                    placeholder: "End Location (lat,lng)",
                    value: session.end.as_str().into(),
                },
                submit_label: "Get Directions",
                category: Dropdown {
                    selected: session.category,
                    options: category_options(),
                },
            },
            map: MapView {
                center: start.unwrap_or(map.default_center),
                zoom: map.default_zoom,
                route,
                markers,
            },
            error: session.error.as_ref().map(|error| error.message.clone()),
            places: PlaceList {
                heading: "Places along the route:",
                items,
                empty_text,
            },
        }
    }
}

/// Unparsable input draws no marker.
fn parsed(input: &LocationInput) -> Option<Coordinates> {
    input.coordinates().and_then(|result| result.ok())
}

#[test]
fn render_empty_session_test() {
    let session = Session::new();
    let view = View::render(&session, &MapSettings::default());

    assert_eq!(view.title, "Route with Places Filter");
    assert_eq!(view.status, Status::Idle);
    assert_eq!(view.map.center, Coordinates::new(0.0, 0.0));
    assert_eq!(view.map.zoom, 10);
    assert!(view.map.markers.is_empty());
    assert!(view.map.route.is_none());
    assert_eq!(view.places.empty_text, Some("No places found."));
    assert_eq!(view.controls.category.selected, Category::Hospital);
    assert_eq!(view.controls.category.options.len(), 3);
}

#[test]
fn render_centers_on_parsed_start_test() {
    let map = MapSettings {
        default_center: Coordinates::new(37.7749, -122.4194),
        default_zoom: 10,
    };

    let mut session = Session::new();
    session.set_inputs(Some("0,0".into()), Some("not a place".into()));

    let view = View::render(&session, &map);

    // "0,0" is a real location, not the unset state
    assert_eq!(view.map.center, Coordinates::new(0.0, 0.0));
    assert_eq!(view.map.markers.len(), 1);
    assert_eq!(view.map.markers[0].kind, MarkerKind::Start);
    assert_eq!(view.controls.end.value, "not a place");
}

#[test]
fn render_route_and_places_test() {
    use crate::entities::{Directions, Place};

    let mut session = Session::new();
    session.set_inputs(Some("1,1".into()), Some("2,2".into()));

    let (id, _) = session.begin_route_request().unwrap();
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    session.complete_route_request(id, Ok(directions));

    let (id, _) = session.begin_places_request().unwrap();
    session.complete_places_request(
        id,
        Ok(vec![
            Place::new("Highland Hospital", "1411 E 31st St", Coordinates::new(2.01, 2.0)),
            Place::new("Alta Bates", "2450 Ashby Ave", Coordinates::new(2.0, 2.02)),
        ]),
    );

    let view = View::render(&session, &MapSettings::default());

    assert_eq!(view.status, Status::Ready);
    assert_eq!(view.map.center, Coordinates::new(1.0, 1.0));
    assert!(view.map.route.as_ref().unwrap().suppress_markers);
    assert_eq!(view.map.route.unwrap().polylines.len(), 1);

    let kinds: Vec<MarkerKind> = view.map.markers.iter().map(|m| m.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            MarkerKind::Start,
            MarkerKind::End,
            MarkerKind::Place,
            MarkerKind::Place
        ]
    );
    assert_eq!(view.map.markers[2].title.as_deref(), Some("Highland Hospital"));

    assert_eq!(view.places.items.len(), 2);
    assert_eq!(view.places.items[1].vicinity, "2450 Ashby Ave");
    assert!(view.places.empty_text.is_none());
    assert!(view.error.is_none());
}
