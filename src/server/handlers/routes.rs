use axum::extract::{Extension, Json, Path};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::{GenerateParams, GeneratedRoute};
use crate::auth::Identity;
use crate::entities::{Coordinates, Route};
use crate::error::{internal_error, Error};
use crate::server::DynAPI;

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    start: Option<Coordinates>,
    distance_km: Option<Value>,
    place_name: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<GeneratedRoute>, Error> {
    let generated = api
        .generate_round_trip(GenerateParams {
            start: params.start,
            distance_km: lenient_distance(params.distance_km.as_ref()),
            place_name: params.place_name,
        })
        .await?;

    Ok(generated.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    identity: Identity,
) -> Result<Json<Vec<Route>>, Error> {
    let routes = api.list_visible(identity.0).await?;

    Ok(routes.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Route>, Error> {
    let route = api.find_route(id, identity.0).await?;

    Ok(route.into())
}

#[derive(Debug, Deserialize)]
pub struct ClaimParams {
    token: Uuid,
}

pub async fn claim(
    Extension(api): Extension<DynAPI>,
    identity: Identity,
    Json(params): Json<ClaimParams>,
) -> Result<Json<Route>, Error> {
    let user_id = identity.require()?;
    let route = api.claim_route(params.token, user_id).await?;

    Ok(route.into())
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    title: Option<String>,
    is_public: Option<bool>,
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    identity: Identity,
    Path(id): Path<i64>,
    Json(params): Json<UpdateParams>,
) -> Result<Json<Route>, Error> {
    let requester_id = identity.require()?;
    let route = api
        .update_route(id, requester_id, params.title, params.is_public)
        .await?;

    Ok(route.into())
}

pub async fn download_gpx(
    Extension(api): Extension<DynAPI>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Response, Error> {
    let download = api.export_gpx(id, identity.0).await?;

    let disposition = format!("attachment; filename=\"{}\"", download.filename);

    let mut response = (StatusCode::OK, download.content).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/gpx+xml"),
    );
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|_| internal_error())?,
    );

    Ok(response)
}

/// The distance preference is best-effort: numbers are taken as-is, numeric
/// strings are parsed, anything else falls through to the default downstream.
fn lenient_distance(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_distance_accepts_numbers_and_numeric_strings() {
        assert_eq!(lenient_distance(Some(&json!(20))), Some(20));
        assert_eq!(lenient_distance(Some(&json!("35"))), Some(35));
        assert_eq!(lenient_distance(Some(&json!(" 35 "))), Some(35));
    }

    #[test]
    fn lenient_distance_drops_garbage() {
        assert_eq!(lenient_distance(Some(&json!("far"))), None);
        assert_eq!(lenient_distance(Some(&json!(20.5))), None);
        assert_eq!(lenient_distance(Some(&json!(null))), None);
        assert_eq!(lenient_distance(Some(&json!({"km": 20}))), None);
        assert_eq!(lenient_distance(None), None);
    }
}
