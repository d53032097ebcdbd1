use axum::extract::{Extension, Json};
use serde::Deserialize;

use crate::entities::User;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    social_id: String,
    nickname: Option<String>,
    email: Option<String>,
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<User>, Error> {
    let user = api
        .login(params.social_id, params.nickname, params.email)
        .await?;

    Ok(user.into())
}
