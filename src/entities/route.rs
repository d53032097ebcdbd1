use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{BoundingBox, Coordinates, FALLBACK_START};
use crate::error::{format_error, unauthorized_error, Error};

pub const DEFAULT_DISTANCE_KM: i64 = 20;
pub const MIN_DISTANCE_KM: i64 = 1;
pub const MAX_DISTANCE_KM: i64 = 100;

/// Storage ceiling for the encoded polyline column.
pub const MAX_POLYLINE_LEN: usize = 10_000;

const CLAIM_TICKET_TTL_MINUTES: i64 = 30;

/// Validated input to round-trip generation. Construction repairs bad input
/// instead of rejecting it: a missing or out-of-range distance falls back to
/// 20 km, a missing or malformed start point falls back to a fixed location.
/// Routing preferences are best-effort, they never block route creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteRequest {
    pub start: Coordinates,
    pub distance_km: i64,
}

impl RouteRequest {
    pub fn new(start: Option<Coordinates>, distance_km: Option<i64>) -> Self {
        let start = start.filter(|c| c.is_valid()).unwrap_or(FALLBACK_START);

        let distance_km = distance_km
            .filter(|km| (MIN_DISTANCE_KM..=MAX_DISTANCE_KM).contains(km))
            .unwrap_or(DEFAULT_DISTANCE_KM);

        Self { start, distance_km }
    }

    pub fn length_meters(&self) -> i64 {
        self.distance_km * 1000
    }
}

/// Normalized output of a successful gateway call. Produced only from a
/// well-formed provider response, never partially populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance: f64,
    pub duration: f64,
    pub bbox: Option<BoundingBox>,
    pub geometry: String,
}

/// A route that has not been persisted yet, so it carries no id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewRoute {
    pub title: Option<String>,
    pub distance: i64,
    pub duration: i64,
    pub bbox: Option<BoundingBox>,
    pub polyline: String,
    pub created_at: DateTime<Utc>,
}

impl NewRoute {
    /// Rounding from the provider's fractional meters and seconds happens
    /// here, once, at the boundary.
    pub fn from_result(result: RouteResult, title: Option<String>) -> Result<Self, Error> {
        if result.geometry.is_empty() || result.geometry.len() > MAX_POLYLINE_LEN {
            return Err(format_error());
        }

        Ok(Self {
            title,
            distance: result.distance.round() as i64,
            duration: result.duration.round() as i64,
            bbox: result.bbox,
            polyline: result.geometry,
            created_at: Utc::now(),
        })
    }

    pub fn into_route(self, id: i64) -> Route {
        Route {
            id,
            user_id: None,
            is_public: false,
            title: self.title,
            distance: self.distance,
            duration: self.duration,
            bbox: self.bbox,
            polyline: self.polyline,
            created_at: self.created_at,
        }
    }
}

/// The persisted, user-facing record. Created unclaimed and private; the id
/// is assigned by the store and never changes afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub user_id: Option<i64>,
    pub is_public: bool,
    pub title: Option<String>,
    pub distance: i64,
    pub duration: i64,
    pub bbox: Option<BoundingBox>,
    pub polyline: String,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// One-time ownership assignment. Claiming an unclaimed route succeeds
    /// and reports a change; re-claiming by the same user is a no-op; any
    /// other user is rejected.
    #[tracing::instrument]
    pub fn claim(&mut self, user_id: i64) -> Result<bool, Error> {
        match self.user_id {
            None => {
                self.user_id = Some(user_id);
                Ok(true)
            }
            Some(owner) if owner == user_id => Ok(false),
            Some(_) => Err(unauthorized_error()),
        }
    }

    /// Owner-only edit of title and visibility. Reports whether anything
    /// actually changed so callers can skip no-op writes.
    #[tracing::instrument]
    pub fn update_details(
        &mut self,
        requester_id: i64,
        title: Option<String>,
        is_public: Option<bool>,
    ) -> Result<bool, Error> {
        if self.user_id != Some(requester_id) {
            return Err(unauthorized_error());
        }

        let mut changed = false;

        if let Some(title) = title {
            if self.title.as_deref() != Some(title.as_str()) {
                self.title = Some(title);
                changed = true;
            }
        }

        if let Some(is_public) = is_public {
            if self.is_public != is_public {
                self.is_public = is_public;
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Visibility check for reads and exports. Listing filters are not
    /// enough, every by-id access goes through here.
    pub fn check_view(&self, requester_id: Option<i64>) -> Result<(), Error> {
        if self.is_public {
            return Ok(());
        }

        match requester_id {
            Some(id) if self.user_id == Some(id) => Ok(()),
            _ => Err(unauthorized_error()),
        }
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "Untitled Route",
        }
    }

    /// Distance in km, rounded to the nearest 0.1.
    pub fn distance_km(&self) -> f64 {
        (self.distance as f64 / 100.0).round() / 10.0
    }

    /// Duration rounded to the nearest minute.
    pub fn duration_minutes(&self) -> i64 {
        (self.duration as f64 / 60.0).round() as i64
    }
}

/// Short-lived token handed out with a freshly generated route, redeemable
/// once the user has logged in to take ownership of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaimTicket {
    pub token: Uuid,
    pub route_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl ClaimTicket {
    pub fn new(route_id: i64) -> Self {
        Self {
            token: Uuid::new_v4(),
            route_id,
            expires_at: Utc::now() + Duration::minutes(CLAIM_TICKET_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
