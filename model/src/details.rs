use geom::Duration;
use serde::Serialize;

use catalogue::{Catalogue, GeoPoint, LineId};

use crate::{VehicleId, VehiclePosition};

/// Sent to whoever displays vehicle details when a marker is tapped
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VehicleDetails {
    pub vehicle_id: VehicleId,
    pub line: LineId,
    pub line_name: Option<String>,
    pub number: usize,
    pub position: GeoPoint,
    pub route_index: usize,
    /// Where the vehicle goes on the next tick
    pub next_stop_index: usize,
    /// Points left before the end of the route
    pub stops_remaining: usize,
    /// Time until the end of the route at the current tick rate
    pub eta: Duration,
}

impl VehicleDetails {
    /// None if the vehicle's route can't be resolved anymore
    pub fn new(
        pos: &VehiclePosition,
        catalogue: &Catalogue,
        tick_period: Duration,
    ) -> Option<Self> {
        let route = catalogue.get(&pos.line)?;
        let position = route.point(pos.route_index())?;
        let stops_remaining = route.len() - 1 - pos.route_index();
        Some(Self {
            vehicle_id: pos.id.clone(),
            line: pos.line.clone(),
            line_name: catalogue
                .line_info(&pos.line)
                .map(|info| info.name.clone()),
            number: pos.number,
            position,
            route_index: pos.route_index(),
            next_stop_index: (pos.route_index() + 1) % route.len(),
            stops_remaining,
            eta: Duration::seconds(tick_period.inner_seconds() * stops_remaining as f64),
        })
    }

    pub fn describe(&self) -> String {
        let mut lines = vec![format!("Bus {} on line {}", self.number, self.line)];
        if let Some(ref name) = self.line_name {
            lines.push(name.clone());
        }
        lines.push(format!("Next stop: #{}", self.next_stop_index + 1));
        lines.push(format!(
            "End of route in {} ({} stops)",
            self.eta, self.stops_remaining
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Reseed, Simulator};

    #[test]
    fn details_for_bundled_line() {
        let catalogue = Catalogue::bundled().unwrap();
        let mut sim = Simulator::new(Reseed::Replace);
        sim.reseed(&catalogue, &[LineId::from("20")]);

        let pos = sim.find(&VehicleId::new(&"20".into(), 2)).unwrap();
        let details = VehicleDetails::new(pos, &catalogue, Duration::seconds(1.0)).unwrap();
        assert_eq!(details.route_index, 6);
        assert_eq!(details.next_stop_index, 7);
        assert_eq!(details.stops_remaining, 1);
        assert_eq!(details.eta, Duration::seconds(1.0));
        assert_eq!(details.line_name.as_deref(), Some("Aveiro ↔ Praia de Mira"));
        assert!(details.describe().starts_with("Bus 2 on line 20"));

        // The last point loops back to the start
        sim.tick(&catalogue);
        let pos = sim.find(&VehicleId::new(&"20".into(), 2)).unwrap();
        let details = VehicleDetails::new(pos, &catalogue, Duration::seconds(2.0)).unwrap();
        assert_eq!(details.next_stop_index, 0);
        assert_eq!(details.eta, Duration::ZERO);
    }
}
