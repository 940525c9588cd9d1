use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

impl Place {
    pub fn new(name: &str, vicinity: &str, location: Coordinates) -> Self {
        Self {
            place_id: None,
            name: name.into(),
            vicinity: Some(vicinity.into()),
            formatted_address: None,
            geometry: Geometry { location },
        }
    }

    pub fn location(&self) -> Coordinates {
        self.geometry.location
    }

    /// Text search results usually carry `formatted_address` instead of
    /// `vicinity`.
    pub fn display_vicinity(&self) -> &str {
        self.vicinity
            .as_deref()
            .or(self.formatted_address.as_deref())
            .unwrap_or_default()
    }
}

#[test]
fn display_vicinity_falls_back_to_address_test() {
    let place: Place = serde_json::from_value(serde_json::json!({
        "name": "UCSF Medical Center",
        "formatted_address": "505 Parnassus Ave, San Francisco, CA 94143",
        "geometry": { "location": { "lat": 37.7632, "lng": -122.4578 } },
    }))
    .unwrap();

    assert_eq!(
        place.display_vicinity(),
        "505 Parnassus Ave, San Francisco, CA 94143"
    );

    let place = Place::new("Corner Store", "1 Main St", place.location());
    assert_eq!(place.display_vicinity(), "1 Main St");
}
