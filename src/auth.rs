use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};

use crate::error::{bad_input_error, unauthorized_error, Error};

/// Header carrying the authenticated user id. The OAuth exchange happens in
/// an upstream layer; by the time a request arrives here the header is
/// trusted.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// The requester's identity, or `None` for anonymous requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity(pub Option<i64>);

impl Identity {
    /// For operations that have no anonymous variant (claiming, editing).
    pub fn require(self) -> Result<i64, Error> {
        self.0.ok_or_else(unauthorized_error)
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for Identity {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        match req.headers().get(IDENTITY_HEADER) {
            None => Ok(Identity(None)),
            Some(value) => {
                let id = value
                    .to_str()
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(bad_input_error)?;

                Ok(Identity(Some(id)))
            }
        }
    }
}
