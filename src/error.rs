use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BadInput,
    NotFound,
    Unauthorized,
    UpstreamUnavailable,
    FormatError,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: Kind,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.kind {
            Kind::BadInput => (StatusCode::BAD_REQUEST, self.message.as_str()),
            Kind::NotFound => (StatusCode::NOT_FOUND, self.message.as_str()),
            Kind::Unauthorized => (StatusCode::FORBIDDEN, self.message.as_str()),
            Kind::UpstreamUnavailable => (StatusCode::BAD_GATEWAY, self.message.as_str()),
            Kind::FormatError => (StatusCode::INTERNAL_SERVER_ERROR, self.message.as_str()),
            Kind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let body = Json(json!({
            "kind": format!("{:?}", self.kind),
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn bad_input_error() -> Error {
    Error {
        kind: Kind::BadInput,
        message: "invalid input".into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        kind: Kind::NotFound,
        message: "not found".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        kind: Kind::Unauthorized,
        message: "unauthorized".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        kind: Kind::UpstreamUnavailable,
        message: "upstream error".into(),
    }
}

pub fn format_error() -> Error {
    Error {
        kind: Kind::FormatError,
        message: "malformed geometry".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        kind: Kind::Internal,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(_: T) -> Error {
    Error {
        kind: Kind::Internal,
        message: "database error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        kind: Kind::UpstreamUnavailable,
        message: "routing provider unreachable".into(),
    }
}

pub fn internal_error() -> Error {
    Error {
        kind: Kind::Internal,
        message: "unexpected error".into(),
    }
}
