use std::fmt;

use serde::{Deserialize, Serialize};

use catalogue::{Catalogue, LineId};

use crate::{Omission, Reseed};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(line: &LineId, number: usize) -> Self {
        Self(format!("{line}-bus{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a synthetic vehicle is along its line's route. Only the `Simulator` moves these.
#[derive(Clone, Debug, PartialEq)]
pub struct VehiclePosition {
    pub id: VehicleId,
    pub line: LineId,
    pub number: usize,
    route_index: usize,
}

impl VehiclePosition {
    pub fn route_index(&self) -> usize {
        self.route_index
    }
}

/// A vehicle ready to draw. Derived from a `VehiclePosition` and never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub line: LineId,
    pub number: usize,
    pub lat: f64,
    pub lng: f64,
}

/// Owns every synthetic vehicle and moves them one route point per tick.
pub struct Simulator {
    positions: Vec<VehiclePosition>,
    // The lines last seeded from, so Reseed::Diff knows what changed
    seeded_lines: Vec<LineId>,
    reseed: Reseed,
    ticks: usize,
}

impl Simulator {
    pub fn new(reseed: Reseed) -> Self {
        Self {
            positions: Vec::new(),
            seeded_lines: Vec::new(),
            reseed,
            ticks: 0,
        }
    }

    /// Brings the vehicles in line with a new set of active lines, following the configured
    /// `Reseed` policy.
    pub fn reseed(&mut self, catalogue: &Catalogue, active: &[LineId]) {
        match self.reseed {
            Reseed::Replace => self.replace_all(catalogue, active),
            Reseed::Diff => self.apply_diff(catalogue, active),
        }
    }

    /// Discards every vehicle and seeds all active lines from scratch. Progress along routes is
    /// lost, even for lines that stay active.
    pub fn replace_all(&mut self, catalogue: &Catalogue, active: &[LineId]) {
        self.positions = active
            .iter()
            .flat_map(|line| seed_or_log(catalogue, line))
            .collect();
        self.seeded_lines = active.to_vec();
        self.ticks = 0;
        debug!(
            "Seeded {} vehicles for {} active lines",
            self.positions.len(),
            active.len()
        );
    }

    fn apply_diff(&mut self, catalogue: &Catalogue, active: &[LineId]) {
        let mut old = std::mem::take(&mut self.positions);
        let mut positions = Vec::new();
        for line in active {
            if self.seeded_lines.contains(line) {
                positions.extend(old.iter().filter(|pos| &pos.line == line).cloned());
            } else {
                positions.extend(seed_or_log(catalogue, line));
            }
        }
        old.retain(|pos| !active.contains(&pos.line));
        if !old.is_empty() {
            debug!("Removed {} vehicles from inactive lines", old.len());
        }
        self.positions = positions;
        self.seeded_lines = active.to_vec();
    }

    /// Moves every vehicle to the next point along its route, looping back to the start after
    /// the last point. Vehicles whose route disappeared stay put.
    pub fn tick(&mut self, catalogue: &Catalogue) {
        for pos in &mut self.positions {
            let len = match catalogue.get(&pos.line) {
                Some(route) if !route.is_empty() => route.len(),
                _ => {
                    debug!("{}", Omission::StaleVehicle(pos.id.clone()));
                    continue;
                }
            };
            let next = pos.route_index + 1;
            pos.route_index = if next >= len { 0 } else { next };
        }
        self.ticks += 1;
    }

    pub fn reset(&mut self) {
        self.positions.clear();
        self.seeded_lines.clear();
        self.ticks = 0;
    }

    pub fn positions(&self) -> &[VehiclePosition] {
        &self.positions
    }

    pub fn find(&self, id: &VehicleId) -> Option<&VehiclePosition> {
        self.positions.iter().find(|pos| &pos.id == id)
    }

    /// Ticks since the last full reseed
    pub fn tick_count(&self) -> usize {
        self.ticks
    }

    /// Projects every position through its route. Positions that can't be resolved anymore are
    /// skipped.
    pub fn vehicles(&self, catalogue: &Catalogue) -> Vec<Vehicle> {
        self.positions
            .iter()
            .filter_map(|pos| {
                let pt = catalogue.get(&pos.line)?.point(pos.route_index)?;
                Some(Vehicle {
                    id: pos.id.clone(),
                    line: pos.line.clone(),
                    number: pos.number,
                    lat: pt.latitude,
                    lng: pt.longitude,
                })
            })
            .collect()
    }
}

/// Two vehicles per line, a quarter and three quarters of the way along the route.
pub fn seed(catalogue: &Catalogue, line: &LineId) -> Result<Vec<VehiclePosition>, Omission> {
    let route = catalogue
        .get(line)
        .ok_or_else(|| Omission::UnknownLine(line.clone()))?;
    if !route.can_host_vehicles() {
        return Err(Omission::DegenerateRoute(line.clone(), route.len()));
    }
    let len = route.len();
    Ok(vec![len / 4, len * 3 / 4]
        .into_iter()
        .enumerate()
        .map(|(idx, route_index)| VehiclePosition {
            id: VehicleId::new(line, idx + 1),
            line: line.clone(),
            number: idx + 1,
            route_index,
        })
        .collect())
}

fn seed_or_log(catalogue: &Catalogue, line: &LineId) -> Vec<VehiclePosition> {
    match seed(catalogue, line) {
        Ok(positions) => positions,
        Err(omission) => {
            debug!("{omission}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use catalogue::{GeoPoint, Route};

    use super::*;

    fn straight_route(line: &str, len: usize) -> Route {
        Route::new(
            line.into(),
            (0..len)
                .map(|i| GeoPoint::new(40.0 + 0.001 * i as f64, -8.0))
                .collect(),
        )
    }

    fn catalogue() -> Catalogue {
        Catalogue::from_routes(vec![
            straight_route("20", 8),
            straight_route("15", 12),
            straight_route("short", 1),
            straight_route("empty", 0),
        ])
    }

    fn indices(sim: &Simulator) -> Vec<usize> {
        sim.positions().iter().map(|p| p.route_index()).collect()
    }

    fn lines(ids: &[&str]) -> Vec<LineId> {
        ids.iter().map(|x| LineId::from(*x)).collect()
    }

    #[test]
    fn seed_at_quarters() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["20"]));
        assert_eq!(indices(&sim), vec![2, 6]);
        assert_eq!(sim.positions()[0].id.as_str(), "20-bus1");
        assert_eq!(sim.positions()[1].id.as_str(), "20-bus2");
        assert_eq!(sim.positions()[1].number, 2);

        for len in 2..40 {
            let catalogue = Catalogue::from_routes(vec![straight_route("x", len)]);
            let positions = seed(&catalogue, &"x".into()).unwrap();
            assert_eq!(positions[0].route_index(), len / 4);
            assert_eq!(positions[1].route_index(), (3 * len) / 4);
            assert!(positions.iter().all(|p| p.route_index() < len));
        }
    }

    #[test]
    fn degenerate_and_unknown_lines_spawn_nothing() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["short", "empty", "99"]));
        assert!(sim.positions().is_empty());
        assert!(sim.vehicles(&catalogue).is_empty());

        assert!(matches!(
            seed(&catalogue, &"99".into()),
            Err(Omission::UnknownLine(_))
        ));
        assert!(matches!(
            seed(&catalogue, &"short".into()),
            Err(Omission::DegenerateRoute(_, 1))
        ));
    }

    #[test]
    fn ticks_wrap_around() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["20"]));
        for _ in 0..3 {
            sim.tick(&catalogue);
        }
        assert_eq!(indices(&sim), vec![5, 1]);
        assert_eq!(sim.tick_count(), 3);

        for n in 0..30 {
            let mut sim = Simulator::new(Reseed::Replace);
            sim.reseed(&catalogue, &lines(&["15"]));
            for _ in 0..n {
                sim.tick(&catalogue);
            }
            assert_eq!(indices(&sim), vec![(3 + n) % 12, (9 + n) % 12]);
        }
    }

    #[test]
    fn vehicles_follow_route_points() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["20"]));
        sim.tick(&catalogue);
        let vehicles = sim.vehicles(&catalogue);
        let route = catalogue.get(&"20".into()).unwrap();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].lat, route.points()[3].latitude);
        assert_eq!(vehicles[1].lng, route.points()[7].longitude);
    }

    #[test]
    fn reactivation_forgets_progress() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["20", "15"]));
        for _ in 0..5 {
            sim.tick(&catalogue);
        }
        sim.reseed(&catalogue, &lines(&["15"]));
        assert!(sim.positions().iter().all(|p| p.line.as_str() == "15"));
        // Full replace also resets the line that stayed active
        assert_eq!(indices(&sim), vec![3, 9]);

        sim.reseed(&catalogue, &lines(&["15", "20"]));
        assert_eq!(indices(&sim), vec![3, 9, 2, 6]);
    }

    #[test]
    fn diff_keeps_progress_of_untouched_lines() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Diff);
        sim.reseed(&catalogue, &lines(&["20", "15"]));
        for _ in 0..5 {
            sim.tick(&catalogue);
        }
        assert_eq!(indices(&sim), vec![7, 3, 8, 2]);

        sim.reseed(&catalogue, &lines(&["15"]));
        assert_eq!(indices(&sim), vec![8, 2]);

        sim.reseed(&catalogue, &lines(&["15", "20"]));
        assert_eq!(indices(&sim), vec![8, 2, 2, 6]);
    }

    #[test]
    fn stale_vehicles_stay_put() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &lines(&["20"]));

        let without_20 = Catalogue::from_routes(vec![straight_route("15", 12)]);
        sim.tick(&without_20);
        assert_eq!(indices(&sim), vec![2, 6]);
        assert!(sim.vehicles(&without_20).is_empty());
        assert_eq!(sim.positions().len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let catalogue = catalogue();
        let mut sim = Simulator::new(Reseed::Diff);
        sim.reseed(&catalogue, &lines(&["20"]));
        sim.tick(&catalogue);
        sim.reset();
        assert!(sim.positions().is_empty());
        assert_eq!(sim.tick_count(), 0);
        sim.reseed(&catalogue, &lines(&["20"]));
        assert_eq!(indices(&sim), vec![2, 6]);
    }
}
