use model::{Outcome, SelectionState, Session};

/// Logs what a screen would have shown for each outcome
pub fn outcomes(session: &Session, outcomes: Vec<Outcome>) {
    for outcome in outcomes {
        match outcome {
            Outcome::ActiveLinesChanged(lines) => {
                let names: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();
                info!(
                    "Active lines: [{}], {} vehicles",
                    names.join(", "),
                    session.vehicles().len()
                );
            }
            Outcome::VehiclesMoved => {
                for vehicle in session.vehicles() {
                    debug!(
                        "  {} at ({:.5}, {:.5})",
                        vehicle.id, vehicle.lat, vehicle.lng
                    );
                }
                info!(
                    "{}: {} vehicles moved",
                    session.clock(),
                    session.vehicles().len()
                );
            }
            Outcome::SelectionChanged(SelectionState::Selected(line)) => {
                info!("Selected line {line}");
            }
            Outcome::SelectionChanged(SelectionState::Unselected) => {
                info!("Nothing selected");
            }
            Outcome::CameraMoved(camera) => {
                let v = camera.viewport;
                info!(
                    "Camera move #{} to frame line {}: center ({:.5}, {:.5}), span {:.4} x {:.4}",
                    camera.seq, camera.line, v.center_lat, v.center_lng, v.lat_span, v.lng_span
                );
            }
            Outcome::VehiclePressed(details) => {
                for line in details.describe().lines() {
                    info!("{line}");
                }
            }
        }
    }
}
