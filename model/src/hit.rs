use geom::{Distance, GPSBounds, LonLat, PolyLine, Pt2D};

use catalogue::{GeoPoint, LineId};

use crate::{Frame, VehicleId};

/// What a tap on the map landed on
#[derive(Clone, Debug, PartialEq)]
pub enum TapTarget {
    Vehicle(VehicleId),
    Route(LineId),
    Background,
}

impl Frame {
    /// Markers are drawn on top of routes, so they win. Otherwise the closest route within
    /// `tolerance` is picked; on ties, the route drawn last.
    pub fn hit_test(
        &self,
        tap: GeoPoint,
        tolerance: Distance,
        marker_radius: Distance,
    ) -> TapTarget {
        // Everything has to be inside the bounds, or to_pt mirrors it across the edge
        let mut gps_bounds = GPSBounds::new();
        gps_bounds.update(lon_lat(tap));
        for pl in &self.polylines {
            for pt in &pl.points {
                gps_bounds.update(lon_lat(*pt));
            }
        }
        for marker in &self.markers {
            gps_bounds.update(lon_lat(marker.pos()));
        }
        let tap_pt = lon_lat(tap).to_pt(&gps_bounds);

        let mut best_marker: Option<(Distance, &VehicleId)> = None;
        for marker in &self.markers {
            let dist = tap_pt.dist_to(lon_lat(marker.pos()).to_pt(&gps_bounds));
            if dist <= marker_radius + tolerance
                && best_marker.map(|(best, _)| dist <= best).unwrap_or(true)
            {
                best_marker = Some((dist, &marker.vehicle.id));
            }
        }
        if let Some((_, id)) = best_marker {
            return TapTarget::Vehicle(id.clone());
        }

        let mut best_route: Option<(Distance, &LineId)> = None;
        for pl in &self.polylines {
            let pts: Vec<Pt2D> = pl
                .points
                .iter()
                .map(|pt| lon_lat(*pt).to_pt(&gps_bounds))
                .collect();
            let dist = match dist_to_route(tap_pt, &pts) {
                Some(dist) => dist,
                None => continue,
            };
            if dist <= tolerance && best_route.map(|(best, _)| dist <= best).unwrap_or(true) {
                best_route = Some((dist, &pl.line));
            }
        }
        match best_route {
            Some((_, line)) => TapTarget::Route(line.clone()),
            None => TapTarget::Background,
        }
    }
}

fn lon_lat(pt: GeoPoint) -> LonLat {
    LonLat::new(pt.longitude, pt.latitude)
}

// None only for an empty route
fn dist_to_route(pos: Pt2D, pts: &[Pt2D]) -> Option<Distance> {
    // Single points and repeated points can't form a PolyLine, so they're checked directly
    let mut best = pts.iter().map(|pt| pos.dist_to(*pt)).reduce(min_dist)?;
    for pair in pts.windows(2) {
        if let Ok(pl) = PolyLine::new(vec![pair[0], pair[1]]) {
            best = min_dist(best, pos.dist_to(pl.project_pt(pos)));
        }
    }
    Some(best)
}

fn min_dist(a: Distance, b: Distance) -> Distance {
    if b < a {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use catalogue::{Catalogue, Route};

    use super::*;
    use crate::{project, ActiveLines, Reseed, SelectionState, Settings, Simulator};

    fn frame() -> Frame {
        // An east-west line and a north-south line crossing near (40.63, -8.65)
        let catalogue = Catalogue::from_routes(vec![
            Route::new(
                "ew".into(),
                (0..8)
                    .map(|i| GeoPoint::new(40.63, -8.66 + 0.002 * i as f64))
                    .collect(),
            ),
            Route::new(
                "ns".into(),
                vec![GeoPoint::new(40.62, -8.65), GeoPoint::new(40.64, -8.65)],
            ),
        ]);
        let active: ActiveLines = vec![LineId::from("ew"), LineId::from("ns")]
            .into_iter()
            .collect();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, active.as_slice());
        project(
            &active,
            &catalogue,
            &sim.vehicles(&catalogue),
            &SelectionState::Unselected,
            &Settings::default(),
        )
    }

    fn tap(frame: &Frame, lat: f64, lng: f64) -> TapTarget {
        frame.hit_test(
            GeoPoint::new(lat, lng),
            Distance::meters(30.0),
            Distance::meters(24.0),
        )
    }

    #[test]
    fn markers_win_over_routes() {
        let frame = frame();
        // ew-bus1 sits at index 2
        assert_eq!(
            tap(&frame, 40.63, -8.656),
            TapTarget::Vehicle(VehicleId::new(&"ew".into(), 1))
        );
        // Slightly off, but within the marker radius
        assert_eq!(
            tap(&frame, 40.6302, -8.6562),
            TapTarget::Vehicle(VehicleId::new(&"ew".into(), 1))
        );
    }

    #[test]
    fn routes_and_background() {
        let frame = frame();
        // On the ew line between points, far from any vehicle
        assert_eq!(tap(&frame, 40.6301, -8.659), TapTarget::Route("ew".into()));
        // On the ns line, away from ew
        assert_eq!(tap(&frame, 40.638, -8.6501), TapTarget::Route("ns".into()));
        // Nowhere near anything
        assert_eq!(tap(&frame, 40.70, -8.70), TapTarget::Background);
    }

    #[test]
    fn single_point_route() {
        let catalogue = Catalogue::from_routes(vec![Route::new(
            "dot".into(),
            vec![GeoPoint::new(40.63, -8.65)],
        )]);
        let active: ActiveLines = vec![LineId::from("dot")].into_iter().collect();
        let frame = project(
            &active,
            &catalogue,
            &[],
            &SelectionState::Unselected,
            &Settings::default(),
        );
        // About 11m north
        assert_eq!(tap(&frame, 40.6301, -8.65), TapTarget::Route("dot".into()));
        // About 110m north
        assert_eq!(tap(&frame, 40.631, -8.65), TapTarget::Background);
    }

    #[test]
    fn taps_outside_the_drawn_area() {
        let frame = frame();
        // Just past either end of the ew line, outside every route point's bounding box
        assert_eq!(tap(&frame, 40.6299, -8.6601), TapTarget::Route("ew".into()));
        assert_eq!(tap(&frame, 40.6299, -8.6459), TapTarget::Route("ew".into()));
    }
}
