#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod active;
mod details;
mod hit;
pub mod palette;
mod render;
mod selection;
mod session;
mod settings;
mod simulator;
mod ticker;
pub mod viewport;

use std::fmt;

use catalogue::LineId;

pub use self::active::ActiveLines;
pub use self::details::VehicleDetails;
pub use self::hit::TapTarget;
pub use self::palette::Color;
pub use self::render::{project, Frame, RoutePolyline, VehicleMarker};
pub use self::selection::{CameraMove, Selection, SelectionState};
pub use self::session::{Event, EventSender, Outcome, Session};
pub use self::settings::{Reseed, Settings};
pub use self::simulator::{seed, Simulator, Vehicle, VehicleId, VehiclePosition};
pub use self::ticker::Ticker;
pub use self::viewport::{fit, Viewport};

/// Something that couldn't be simulated or drawn. These never stop anything; the affected line
/// or vehicle is just left out.
#[derive(Clone, Debug, PartialEq)]
pub enum Omission {
    UnknownLine(LineId),
    /// A route with this many points can't host vehicles
    DegenerateRoute(LineId, usize),
    /// The vehicle's line isn't in the catalogue anymore
    StaleVehicle(VehicleId),
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Omission::UnknownLine(line) => write!(f, "line {line} isn't in the catalogue"),
            Omission::DegenerateRoute(line, len) => {
                write!(f, "line {line} only has {len} points")
            }
            Omission::StaleVehicle(id) => write!(f, "{id} belongs to an unknown line"),
        }
    }
}
