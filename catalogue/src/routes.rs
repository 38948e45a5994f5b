use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::LineId;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.latitude + dlat, self.longitude + dlng)
    }
}

/// The path a line follows, as an ordered list of points. Never changes after loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub line: LineId,
    points: Vec<GeoPoint>,
}

impl Route {
    pub fn new(line: LineId, points: Vec<GeoPoint>) -> Self {
        Self { line, points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, idx: usize) -> Option<GeoPoint> {
        self.points.get(idx).copied()
    }

    /// Vehicles need somewhere to go
    pub fn can_host_vehicles(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Parses a mapping from line ID to an array of `{latitude, longitude}`. Entries that aren't
/// arrays of points are skipped with a warning, so one bad line doesn't take out the rest.
pub fn load_json<R: std::io::Read>(reader: R) -> Result<BTreeMap<LineId, Route>> {
    let raw: BTreeMap<LineId, serde_json::Value> = serde_json::from_reader(reader)?;
    let mut routes = BTreeMap::new();
    for (line, value) in raw {
        if !value.is_array() {
            warn!("Route for line {line} isn't an array of points, skipping");
            continue;
        }
        let points: Vec<GeoPoint> = match serde_json::from_value(value) {
            Ok(points) => points,
            Err(err) => {
                warn!("Route for line {line} has bad points, skipping: {err}");
                continue;
            }
        };
        routes.insert(line.clone(), Route::new(line, points));
    }
    Ok(routes)
}
