use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{ClaimTicket, Coordinates, Route, User};
use crate::error::Error;
use crate::external::Geocoded;
use crate::gpx::GpxDownload;

/// Raw generation input as it arrives from the web layer. All fields are
/// optional; the engine repairs whatever is missing or out of range.
#[derive(Clone, Debug, Default)]
pub struct GenerateParams {
    pub start: Option<Coordinates>,
    pub distance_km: Option<i64>,
    pub place_name: Option<String>,
}

/// Result of a generation request: the persisted route, a ticket the caller
/// can later redeem to claim it, and the decoded path for map display.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedRoute {
    pub route: Route,
    pub claim_ticket: ClaimTicket,
    pub coordinates: Vec<Coordinates>,
}

#[async_trait]
pub trait RouteAPI {
    async fn generate_round_trip(&self, params: GenerateParams) -> Result<GeneratedRoute, Error>;

    async fn find_route(&self, id: i64, requester_id: Option<i64>) -> Result<Route, Error>;

    async fn list_visible(&self, requester_id: Option<i64>) -> Result<Vec<Route>, Error>;

    async fn claim_route(&self, token: Uuid, user_id: i64) -> Result<Route, Error>;

    async fn update_route(
        &self,
        id: i64,
        requester_id: i64,
        title: Option<String>,
        is_public: Option<bool>,
    ) -> Result<Route, Error>;

    async fn export_gpx(&self, id: i64, requester_id: Option<i64>) -> Result<GpxDownload, Error>;

    async fn lookup_location(&self, query: String) -> Result<Geocoded, Error>;
}

#[async_trait]
pub trait AccountAPI {
    async fn login(
        &self,
        social_id: String,
        nickname: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error>;
}

pub trait API: RouteAPI + AccountAPI {}
