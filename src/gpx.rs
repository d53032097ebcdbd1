//! GPX export for bike GPS devices: one track, one segment, one point per
//! decoded coordinate, in path order.

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};

use crate::entities::{Coordinates, Route};
use crate::error::{internal_error, Error};

const CREATOR: &str = "RideTime";
const DESCRIPTION: &str = "This is a cycling route file as GPX, generated from RideTime";

/// A rendered track file ready to be served as a download.
#[derive(Clone, Debug)]
pub struct GpxDownload {
    pub filename: String,
    pub content: Vec<u8>,
}

pub fn route_to_gpx(route: &Route, coordinates: &[Coordinates]) -> Result<GpxDownload, Error> {
    let title = route.display_title();

    let mut metadata = Metadata::default();
    metadata.name = Some(title.to_string());
    metadata.description = Some(DESCRIPTION.to_string());

    let mut track = Track::new();
    track.name = Some(title.to_string());

    let mut segment = TrackSegment::new();
    segment.points = coordinates
        .iter()
        .map(|c| Waypoint::new(Point::new(c.longitude, c.latitude)))
        .collect();
    track.segments.push(segment);

    let mut gpx = Gpx::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(CREATOR.to_string());
    gpx.metadata = Some(metadata);
    gpx.tracks.push(track);

    let mut content = Vec::new();
    gpx::write(&gpx, &mut content).map_err(|_| internal_error())?;

    Ok(GpxDownload {
        filename: format!("{}.gpx", slugify(title)),
        content,
    })
}

/// Reduces a route title to a filename-safe slug: lowercase alphanumerics
/// with single hyphens, nothing else.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("route");
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewRoute, RouteResult};

    fn sample_route(title: Option<&str>) -> Route {
        let result = RouteResult {
            distance: 20400.0,
            duration: 4200.0,
            bbox: None,
            geometry: "abc123".into(),
        };

        NewRoute::from_result(result, title.map(String::from))
            .unwrap()
            .into_route(1)
    }

    #[test]
    fn track_has_one_point_per_coordinate_in_order() {
        let coordinates = vec![
            Coordinates::new(-1.930556, 52.450556),
            Coordinates::new(-1.93061, 52.45102),
            Coordinates::new(-1.92988, 52.45155),
        ];

        let download = route_to_gpx(&sample_route(Some("Route near Birmingham")), &coordinates)
            .unwrap();
        let xml = String::from_utf8(download.content).unwrap();

        assert_eq!(xml.matches("<trkpt").count(), 3);
        assert_eq!(xml.matches("<trkseg>").count(), 1);
        assert_eq!(xml.matches("<trk>").count(), 1);
        assert!(xml.contains("Route near Birmingham"));
        assert!(xml.contains("RideTime"));

        // order and precision survive for GPS import
        let first = xml.find("52.450556").unwrap();
        let second = xml.find("52.45102").unwrap();
        let third = xml.find("52.45155").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn untitled_routes_get_the_placeholder_name() {
        let coordinates = vec![Coordinates::new(-1.930556, 52.450556)];
        let download = route_to_gpx(&sample_route(None), &coordinates).unwrap();

        assert_eq!(download.filename, "untitled-route.gpx");
        let xml = String::from_utf8(download.content).unwrap();
        assert!(xml.contains("Untitled Route"));
    }

    #[test]
    fn slugify_strips_unsafe_characters() {
        assert_eq!(slugify("Route near Birmingham"), "route-near-birmingham");
        assert_eq!(slugify("  Route / near: B30!  "), "route-near-b30");
        assert_eq!(slugify("Çà-va"), "va");
        assert_eq!(slugify("!!!"), "route");
    }
}
