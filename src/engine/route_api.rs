use super::Engine;

use async_trait::async_trait;
use futures::TryStreamExt;
use rand::Rng;
use sqlx::{postgres::PgRow, types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::{GenerateParams, GeneratedRoute, RouteAPI},
    codec,
    entities::{BoundingBox, ClaimTicket, NewRoute, Route, RouteRequest},
    error::{format_error, not_found_error, Error},
    external::Geocoded,
    gpx::GpxDownload,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn generate_round_trip(&self, params: GenerateParams) -> Result<GeneratedRoute, Error> {
        let request = RouteRequest::new(params.start, params.distance_km);

        // decorrelates repeated requests for the same start point
        let seed: i64 = rand::thread_rng().gen_range(0..5000);

        let result = self
            .gateway
            .round_trip(request.start, request.length_meters(), seed)
            .await?;

        let title = params.place_name.map(|place| format!("Route near {}", place));
        let new_route = NewRoute::from_result(result, title)?;

        // a route we cannot decode for display or export never reaches the store
        let coordinates = codec::decode(&new_route.polyline)?;
        if coordinates.is_empty() {
            return Err(format_error());
        }

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let row = tx
            .fetch_one(
                sqlx::query(
                    "INSERT INTO routes (user_id, is_public, title, distance, duration, bbox, polyline, created_at) VALUES (NULL, FALSE, $1, $2, $3, $4, $5, $6) RETURNING id",
                )
                .bind(&new_route.title)
                .bind(new_route.distance)
                .bind(new_route.duration)
                .bind(new_route.bbox.as_ref().map(Json))
                .bind(&new_route.polyline)
                .bind(new_route.created_at),
            )
            .await?;
        let id: i64 = row.try_get("id")?;

        let claim_ticket = ClaimTicket::new(id);
        tx.execute(
            sqlx::query(
                "INSERT INTO claim_tickets (token, route_id, expires_at) VALUES ($1, $2, $3)",
            )
            .bind(&claim_ticket.token)
            .bind(claim_ticket.route_id)
            .bind(claim_ticket.expires_at),
        )
        .await?;

        tx.commit().await?;

        Ok(GeneratedRoute {
            route: new_route.into_route(id),
            claim_ticket,
            coordinates,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_route(&self, id: i64, requester_id: Option<i64>) -> Result<Route, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query(
                    "SELECT id, user_id, is_public, title, distance, duration, bbox, polyline, created_at FROM routes WHERE id = $1",
                )
                .bind(id),
            )
            .await?;

        let result = maybe_result.ok_or_else(not_found_error)?;
        let route = route_from_row(&result)?;

        route.check_view(requester_id)?;

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    async fn list_visible(&self, requester_id: Option<i64>) -> Result<Vec<Route>, Error> {
        let mut conn = self.pool.acquire().await?;

        let query = match requester_id {
            Some(user_id) => sqlx::query(
                "SELECT id, user_id, is_public, title, distance, duration, bbox, polyline, created_at FROM routes WHERE user_id = $1 OR (is_public AND user_id IS DISTINCT FROM $1) ORDER BY created_at DESC",
            )
            .bind(user_id),
            None => sqlx::query(
                "SELECT id, user_id, is_public, title, distance, duration, bbox, polyline, created_at FROM routes WHERE is_public ORDER BY created_at DESC",
            ),
        };

        let mut results = conn.fetch(query);

        let mut routes = Vec::new();
        while let Some(row) = results.try_next().await? {
            routes.push(route_from_row(&row)?);
        }

        Ok(routes)
    }

    #[tracing::instrument(skip(self))]
    async fn claim_route(&self, token: Uuid, user_id: i64) -> Result<Route, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let maybe_ticket = tx
            .fetch_optional(
                sqlx::query("SELECT route_id, expires_at FROM claim_tickets WHERE token = $1")
                    .bind(&token),
            )
            .await?;

        let row = maybe_ticket.ok_or_else(not_found_error)?;
        let ticket = ClaimTicket {
            token,
            route_id: row.try_get("route_id")?,
            expires_at: row.try_get("expires_at")?,
        };

        // an expired ticket is as good as no ticket
        if ticket.is_expired() {
            return Err(not_found_error());
        }

        let row = tx
            .fetch_optional(
                sqlx::query(
                    "SELECT id, user_id, is_public, title, distance, duration, bbox, polyline, created_at FROM routes WHERE id = $1 FOR UPDATE",
                )
                .bind(ticket.route_id),
            )
            .await?
            .ok_or_else(not_found_error)?;

        let mut route = route_from_row(&row)?;

        if route.claim(user_id)? {
            tx.execute(
                sqlx::query("UPDATE routes SET user_id = $2 WHERE id = $1")
                    .bind(route.id)
                    .bind(user_id),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    async fn update_route(
        &self,
        id: i64,
        requester_id: i64,
        title: Option<String>,
        is_public: Option<bool>,
    ) -> Result<Route, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let row = tx
            .fetch_optional(
                sqlx::query(
                    "SELECT id, user_id, is_public, title, distance, duration, bbox, polyline, created_at FROM routes WHERE id = $1 FOR UPDATE",
                )
                .bind(id),
            )
            .await?
            .ok_or_else(not_found_error)?;

        let mut route = route_from_row(&row)?;

        if route.update_details(requester_id, title, is_public)? {
            tx.execute(
                sqlx::query("UPDATE routes SET title = $2, is_public = $3 WHERE id = $1")
                    .bind(route.id)
                    .bind(&route.title)
                    .bind(route.is_public),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    async fn export_gpx(&self, id: i64, requester_id: Option<i64>) -> Result<GpxDownload, Error> {
        // find_route re-checks visibility, exports are just another read
        let route = self.find_route(id, requester_id).await?;
        let coordinates = codec::decode(&route.polyline)?;

        crate::gpx::route_to_gpx(&route, &coordinates)
    }

    #[tracing::instrument(skip(self))]
    async fn lookup_location(&self, query: String) -> Result<Geocoded, Error> {
        self.gateway
            .geocode(&query)
            .await?
            .ok_or_else(not_found_error)
    }
}

fn route_from_row(row: &PgRow) -> Result<Route, Error> {
    let bbox: Option<Json<BoundingBox>> = row.try_get("bbox")?;

    Ok(Route {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        is_public: row.try_get("is_public")?,
        title: row.try_get("title")?,
        distance: row.try_get("distance")?,
        duration: row.try_get("duration")?,
        bbox: bbox.map(|Json(bbox)| bbox),
        polyline: row.try_get("polyline")?,
        created_at: row.try_get("created_at")?,
    })
}
