pub mod openrouteservice;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, RouteResult};
use crate::error::Error;

/// A successful geocoder lookup: the best-matching position plus a display
/// name suitable for "Route near {place}" titles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geocoded {
    pub coordinates: Coordinates,
    pub name: String,
}

/// Seam to the routing provider. The engine receives an implementation at
/// construction, so tests can substitute a fake without network access.
#[async_trait]
pub trait RoutingGateway: Send + Sync {
    /// Requests a cycling loop of roughly `length_meters` starting and
    /// ending at `start`. The seed decorrelates repeated requests for the
    /// same start point; identical inputs are not expected to produce
    /// identical routes.
    async fn round_trip(
        &self,
        start: Coordinates,
        length_meters: i64,
        seed: i64,
    ) -> Result<RouteResult, Error>;

    /// Free-text location lookup. `Ok(None)` means the provider had no
    /// match, which is not an upstream failure.
    async fn geocode(&self, query: &str) -> Result<Option<Geocoded>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewRoute;
    use std::sync::Arc;
    use tokio_test::block_on;

    struct FakeGateway {
        result: RouteResult,
    }

    #[async_trait]
    impl RoutingGateway for FakeGateway {
        async fn round_trip(
            &self,
            _start: Coordinates,
            _length_meters: i64,
            _seed: i64,
        ) -> Result<RouteResult, Error> {
            Ok(self.result.clone())
        }

        async fn geocode(&self, _query: &str) -> Result<Option<Geocoded>, Error> {
            Ok(None)
        }
    }

    #[test]
    fn gateway_result_builds_an_unclaimed_private_route() {
        let gateway: Arc<dyn RoutingGateway> = Arc::new(FakeGateway {
            result: RouteResult {
                distance: 20400.0,
                duration: 4200.0,
                bbox: None,
                geometry: "abc123".into(),
            },
        });

        let start = Coordinates::new(-1.930556, 52.450556);
        let result = block_on(gateway.round_trip(start, 20_000, 0)).unwrap();

        let route = NewRoute::from_result(result, None).unwrap().into_route(1);
        assert_eq!(route.distance, 20400);
        assert_eq!(route.duration, 4200);
        assert_eq!(route.user_id, None);
        assert!(!route.is_public);
    }
}
