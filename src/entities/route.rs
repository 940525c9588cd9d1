use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Driving directions as returned by the routing provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub overview_polyline: Option<Polyline>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: String,
}

impl Directions {
    /// End of the first leg of the first route.
    pub fn destination(&self) -> Option<Coordinates> {
        self.routes
            .first()
            .and_then(|route| route.legs.first())
            .map(|leg| leg.end_location)
    }
}

#[cfg(test)]
impl Directions {
    pub fn ending_at(start: Coordinates, end: Coordinates) -> Self {
        Self {
            routes: vec![Route {
                summary: "test".into(),
                legs: vec![Leg {
                    start_location: start,
                    end_location: end,
                    start_address: "".into(),
                    end_address: "".into(),
                    distance: None,
                    duration: None,
                }],
                overview_polyline: Some(Polyline {
                    points: "_p~iF~ps|U_ulLnnqC".into(),
                }),
            }],
        }
    }
}

#[test]
fn destination_is_first_leg_end_test() {
    let directions = Directions::ending_at(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
    assert_eq!(directions.destination(), Some(Coordinates::new(2.0, 2.0)));

    let empty = Directions { routes: vec![] };
    assert_eq!(empty.destination(), None);
}
