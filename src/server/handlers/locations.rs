use axum::extract::{Extension, Json};
use serde::Deserialize;

use crate::error::Error;
use crate::external::Geocoded;
use crate::server::DynAPI;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: String,
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SearchParams>,
) -> Result<Json<Geocoded>, Error> {
    let place = api.lookup_location(params.query).await?;

    Ok(place.into())
}
