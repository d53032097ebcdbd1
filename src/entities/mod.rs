mod coordinates;
mod route;
mod user;

pub use coordinates::{BoundingBox, Coordinates, FALLBACK_START};
pub use route::{ClaimTicket, NewRoute, Route, RouteRequest, RouteResult, MAX_POLYLINE_LEN};
pub use user::User;
