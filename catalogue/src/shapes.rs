use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::{GeoPoint, LineId, Route};

/// Loads routes from a CSV shaped like GTFS shapes.txt, with one row per point.
pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<LineId, Route>> {
    let mut points_per_line: BTreeMap<LineId, BTreeMap<usize, GeoPoint>> = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let pt = GeoPoint::new(rec.latitude, rec.longitude);
        if points_per_line
            .entry(rec.line_id.clone())
            .or_insert_with(BTreeMap::new)
            .insert(rec.sequence, pt)
            .is_some()
        {
            bail!("Line {} has duplicate sequence {}", rec.line_id, rec.sequence);
        }
    }

    let mut routes = BTreeMap::new();
    for (line, points) in points_per_line {
        // BTreeMap iteration already sorts by sequence
        let points = points.into_values().collect();
        routes.insert(line.clone(), Route::new(line, points));
    }
    Ok(routes)
}

#[derive(Deserialize)]
struct Record {
    line_id: LineId,
    sequence: usize,
    latitude: f64,
    longitude: f64,
}
