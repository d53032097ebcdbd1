mod account_api;
mod route_api;

use std::sync::Arc;

use sqlx::{Executor, Pool, Postgres};

use crate::{api::API, error::Error, external::RoutingGateway};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    gateway: Arc<dyn RoutingGateway>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(
        pool: Pool<Database>,
        gateway: Arc<dyn RoutingGateway>,
    ) -> Result<Self, Error> {
        // account service
        pool.execute("CREATE TABLE IF NOT EXISTS users (id BIGSERIAL PRIMARY KEY, social_id VARCHAR(64) NOT NULL UNIQUE, nickname VARCHAR(64), email VARCHAR(64))")
            .await?;

        // route service
        pool.execute("CREATE TABLE IF NOT EXISTS routes (id BIGSERIAL PRIMARY KEY, user_id INT8 REFERENCES users(id), is_public BOOLEAN NOT NULL DEFAULT FALSE, title VARCHAR(120), distance INT8 NOT NULL, duration INT8 NOT NULL, bbox JSONB, polyline VARCHAR(10000) NOT NULL, created_at TIMESTAMPTZ NOT NULL)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS routes_is_public_idx ON routes (is_public)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS routes_created_at_idx ON routes (created_at)")
            .await?;

        // claim tickets for unsaved routes
        pool.execute("CREATE TABLE IF NOT EXISTS claim_tickets (token UUID PRIMARY KEY, route_id INT8 NOT NULL REFERENCES routes(id), expires_at TIMESTAMPTZ NOT NULL)")
            .await?;

        Ok(Self { pool, gateway })
    }
}

impl API for Engine {}
