mod category;
mod location;
mod place;
mod route;
mod session;

pub use category::Category;
pub use location::{Coordinates, LocationInput};
pub use place::{Geometry, Place};
pub use route::{Directions, Leg, Polyline, Route, TextValue};
pub use session::{ErrorKind, RequestId, Session, SessionError, Status, SEARCH_RADIUS_METERS};
