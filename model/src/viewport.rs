use geom::{GPSBounds, LonLat};
use serde::{Deserialize, Serialize};

use catalogue::{GeoPoint, Route};

use crate::Settings;

/// The visible region of the map, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub lat_span: f64,
    pub lng_span: f64,
}

impl Viewport {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }

    pub fn contains(&self, pt: GeoPoint) -> bool {
        (pt.latitude - self.center_lat).abs() <= self.lat_span / 2.0
            && (pt.longitude - self.center_lng).abs() <= self.lng_span / 2.0
    }
}

/// Frames a route with some padding. Latitude and longitude get different padding, since
/// screens are usually taller than they are wide. Spans are never smaller than
/// `settings.min_span`, so a single-point route still gets a usable region centered on it.
pub fn fit(route: &Route, settings: &Settings) -> Viewport {
    let pts = route.points();
    if pts.is_empty() {
        return settings.default_viewport;
    }

    let mut b = GPSBounds::new();
    for pt in pts {
        b.update(LonLat::new(pt.longitude, pt.latitude));
    }

    Viewport {
        center_lat: (b.min_lat + b.max_lat) / 2.0,
        center_lng: (b.min_lon + b.max_lon) / 2.0,
        lat_span: ((b.max_lat - b.min_lat) * settings.lat_padding).max(settings.min_span),
        lng_span: ((b.max_lon - b.min_lon) * settings.lng_padding).max(settings.min_span),
    }
}
