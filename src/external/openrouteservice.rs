//! Openrouteservice client: round-trip cycling directions plus Pelias
//! geocoding. Responses are parsed into typed structs once, here at the
//! boundary; nothing downstream touches raw provider JSON.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::OrsConfig;
use crate::entities::{BoundingBox, Coordinates, RouteResult};
use crate::error::{bad_input_error, upstream_error, Error};
use crate::external::{Geocoded, RoutingGateway};

const PROFILE: &str = "cycling-road";
const GEOCODE_COUNTRY: &str = "GBR";

#[derive(Debug)]
pub struct OrsGateway {
    client: reqwest::Client,
    config: OrsConfig,
}

impl OrsGateway {
    pub fn new(config: OrsConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    async fn post_directions(&self, body: &serde_json::Value) -> Result<reqwest::Response, Error> {
        let url = format!(
            "https://{}/v2/directions/{}",
            self.config.api_base, PROFILE
        );

        let request = self
            .client
            .post(url)
            .header("Authorization", &self.config.api_key)
            .json(body);

        // one retry on transient transport failure, nothing beyond that
        match request.try_clone().ok_or_else(upstream_error)?.send().await {
            Ok(res) => Ok(res),
            Err(err) if err.is_timeout() || err.is_connect() => Ok(request.send().await?),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl RoutingGateway for OrsGateway {
    #[tracing::instrument(skip(self))]
    async fn round_trip(
        &self,
        start: Coordinates,
        length_meters: i64,
        seed: i64,
    ) -> Result<RouteResult, Error> {
        let body = json!({
            "coordinates": [[start.longitude, start.latitude]],
            "options": {
                "round_trip": { "length": length_meters, "seed": seed }
            }
        });

        let res = self.post_directions(&body).await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(bad_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: DirectionsResponse = res.json().await.map_err(|_| upstream_error())?;

        normalize(data)
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Geocoded>, Error> {
        let url = format!("https://{}/geocode/search", self.config.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(&[("text", query)])
            .query(&[("boundary.country", GEOCODE_COUNTRY)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(bad_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: GeocodeResponse = res.json().await.map_err(|_| upstream_error())?;

        Ok(best_match(data))
    }
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsResponse {
    routes: Vec<DirectionsRoute>,
    bbox: Option<Vec<f64>>,
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsRoute {
    summary: Summary,
    geometry: String,
}

#[derive(Clone, Debug, Deserialize)]
struct Summary {
    distance: f64,
    duration: f64,
}

/// Reduces the provider response to the first candidate route. An empty
/// candidate list is an upstream failure, not a partial result.
fn normalize(response: DirectionsResponse) -> Result<RouteResult, Error> {
    let bbox = response
        .bbox
        .as_deref()
        .and_then(BoundingBox::from_flat);

    let best = response.routes.into_iter().next().ok_or_else(upstream_error)?;

    Ok(RouteResult {
        distance: best.summary.distance,
        duration: best.summary.duration,
        bbox,
        geometry: best.geometry,
    })
}

#[derive(Clone, Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Clone, Debug, Deserialize)]
struct GeocodeFeature {
    geometry: FeatureGeometry,
    properties: FeatureProperties,
}

#[derive(Clone, Debug, Deserialize)]
struct FeatureGeometry {
    coordinates: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct FeatureProperties {
    name: Option<String>,
}

fn best_match(response: GeocodeResponse) -> Option<Geocoded> {
    let feature = response.features.into_iter().next()?;

    if feature.geometry.coordinates.len() < 2 {
        return None;
    }

    let coordinates = Coordinates::new(
        feature.geometry.coordinates[0],
        feature.geometry.coordinates[1],
    );

    // a feature outside WGS84 range is no match, not a start point
    if !coordinates.is_valid() {
        return None;
    }

    Some(Geocoded {
        coordinates,
        name: feature.properties.name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_the_first_candidate_route() {
        let data: DirectionsResponse = serde_json::from_str(
            r#"{
                "routes": [
                    {"summary": {"distance": 20400.0, "duration": 4200.0}, "geometry": "abc123"},
                    {"summary": {"distance": 31000.0, "duration": 6000.0}, "geometry": "zzz"}
                ],
                "bbox": [-1.95, 52.40, -1.88, 52.48]
            }"#,
        )
        .unwrap();

        let result = normalize(data).unwrap();
        assert_eq!(result.distance, 20400.0);
        assert_eq!(result.duration, 4200.0);
        assert_eq!(result.geometry, "abc123");

        let bbox = result.bbox.unwrap();
        assert_eq!(bbox.min, Coordinates::new(-1.95, 52.40));
        assert_eq!(bbox.max, Coordinates::new(-1.88, 52.48));
    }

    #[test]
    fn missing_bbox_is_not_an_error() {
        let data: DirectionsResponse = serde_json::from_str(
            r#"{"routes": [{"summary": {"distance": 1.0, "duration": 2.0}, "geometry": "g"}]}"#,
        )
        .unwrap();

        let result = normalize(data).unwrap();
        assert_eq!(result.bbox, None);
    }

    #[test]
    fn zero_route_response_is_an_upstream_failure() {
        let data: DirectionsResponse =
            serde_json::from_str(r#"{"routes": [], "bbox": null}"#).unwrap();

        let err = normalize(data).unwrap_err();
        assert_eq!(err.kind, crate::error::Kind::UpstreamUnavailable);
    }

    #[test]
    fn malformed_summary_fails_at_parse_time() {
        let parsed = serde_json::from_str::<DirectionsResponse>(
            r#"{"routes": [{"summary": {"distance": "far"}, "geometry": "g"}]}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn geocode_takes_the_top_feature() {
        let data: GeocodeResponse = serde_json::from_str(
            r#"{
                "features": [
                    {"geometry": {"coordinates": [-1.8904, 52.4862]}, "properties": {"name": "Birmingham"}},
                    {"geometry": {"coordinates": [0.0, 0.0]}, "properties": {"name": "Elsewhere"}}
                ]
            }"#,
        )
        .unwrap();

        let place = best_match(data).unwrap();
        assert_eq!(place.name, "Birmingham");
        assert_eq!(place.coordinates, Coordinates::new(-1.8904, 52.4862));
    }

    #[test]
    fn geocode_with_no_features_is_no_match() {
        let data: GeocodeResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(best_match(data).is_none());
    }

    #[test]
    fn geocode_rejects_out_of_range_coordinates() {
        let data: GeocodeResponse = serde_json::from_str(
            r#"{"features": [{"geometry": {"coordinates": [512.0, 52.48]}, "properties": {"name": "Nowhere"}}]}"#,
        )
        .unwrap();

        assert!(best_match(data).is_none());
    }
}
