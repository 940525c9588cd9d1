use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{invalid_location_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

/// Parses free text of the form `"lat,lng"`.
///
/// Anything that would not place a marker on a real map is rejected,
/// including `NaN`, infinities and out of range values.
impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split(',');

        let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
            _ => return Err(invalid_location_error("expected \"lat,lng\"")),
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| invalid_location_error("latitude is not a number"))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| invalid_location_error("longitude is not a number"))?;

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(invalid_location_error("latitude must be between -90 and 90"));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid_location_error(
                "longitude must be between -180 and 180",
            ));
        }

        Ok(Self { lat, lng })
    }
}

/// Raw text of a start or end input box.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationInput(pub String);

impl LocationInput {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` while the box is empty, so that `"0,0"` stays distinguishable
    /// from "nothing entered yet".
    pub fn coordinates(&self) -> Option<Result<Coordinates, Error>> {
        if self.is_empty() {
            return None;
        }

        Some(self.0.parse())
    }
}

impl From<String> for LocationInput {
    fn from(input: String) -> Self {
        Self(input)
    }
}

impl From<&str> for LocationInput {
    fn from(input: &str) -> Self {
        Self(input.into())
    }
}

#[test]
fn parse_lat_lng_test() {
    let coordinates: Coordinates = "37.7749,-122.4194".parse().unwrap();
    assert_eq!(coordinates, Coordinates::new(37.7749, -122.4194));

    let coordinates: Coordinates = " 37.8044 , -122.2712 ".parse().unwrap();
    assert_eq!(coordinates, Coordinates::new(37.8044, -122.2712));
}

#[test]
fn zero_zero_is_not_unset_test() {
    let input = LocationInput::from("0,0");
    let coordinates = input.coordinates().unwrap().unwrap();
    assert_eq!(coordinates, Coordinates::new(0.0, 0.0));

    assert!(LocationInput::default().coordinates().is_none());
    assert!(LocationInput::from("   ").coordinates().is_none());
}

#[test]
fn malformed_input_is_rejected_test() {
    for input in [
        "37.7749",
        "37.7749,-122.4194,5",
        "abc,def",
        "NaN,1",
        "1,inf",
        "91,0",
        "0,-181",
        "San Francisco",
    ] {
        let result: Result<Coordinates, Error> = input.parse();
        let err = result.unwrap_err();
        assert_eq!(err.code, 101, "{input}");
    }
}

#[test]
fn coordinates_to_query_string_test() {
    let location: String = Coordinates::new(2.0, -2.5).into();
    assert_eq!(location, "2,-2.5");
}
