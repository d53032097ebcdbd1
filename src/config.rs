use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{internal_error, Error};

/// Everything the process reads from the environment, collected once at
/// startup. Handles that need provider credentials receive them from here
/// instead of reaching into the environment themselves.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub ors: OrsConfig,
}

/// Openrouteservice client settings.
#[derive(Clone, Debug)]
pub struct OrsConfig {
    pub api_base: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let database_url = env::var("DATABASE_URL")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".into())
            .parse()
            .map_err(|_| internal_error())?;

        let api_base =
            env::var("ORS_API_BASE").unwrap_or_else(|_| "api.openrouteservice.org".into());
        let api_key = env::var("ORS_API_KEY")?;

        let timeout_secs = env::var("ORS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url,
            bind_addr,
            ors: OrsConfig {
                api_base,
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
