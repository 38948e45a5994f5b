use serde::{Deserialize, Serialize};

use catalogue::{Catalogue, LineId};

use crate::{viewport, Omission, Settings, Viewport};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    Unselected,
    Selected(LineId),
}

/// A request to animate the camera. Hosts only need to honor the one with the highest `seq`;
/// anything older has been superseded.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraMove {
    pub seq: usize,
    pub line: LineId,
    pub viewport: Viewport,
}

/// Tracks the single focused line, if any.
pub struct Selection {
    state: SelectionState,
    next_seq: usize,
    latest_move: Option<CameraMove>,
}

impl Selection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Unselected,
            next_seq: 0,
            latest_move: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&LineId> {
        match self.state {
            SelectionState::Selected(ref line) => Some(line),
            SelectionState::Unselected => None,
        }
    }

    pub fn is_selected(&self, line: &LineId) -> bool {
        self.selected() == Some(line)
    }

    /// Focuses a line and frames it. Lines without a drawable route are ignored and the state
    /// stays as it was. Selecting the same line again issues the same camera move again.
    pub fn select_line(
        &mut self,
        line: &LineId,
        catalogue: &Catalogue,
        settings: &Settings,
    ) -> Option<CameraMove> {
        let route = match catalogue.get(line) {
            Some(route) => route,
            None => {
                debug!("Not selecting: {}", Omission::UnknownLine(line.clone()));
                return None;
            }
        };
        if route.is_empty() {
            debug!(
                "Not selecting: {}",
                Omission::DegenerateRoute(line.clone(), 0)
            );
            return None;
        }

        self.state = SelectionState::Selected(line.clone());
        let camera = CameraMove {
            seq: self.next_seq,
            line: line.clone(),
            viewport: viewport::fit(route, settings),
        };
        self.next_seq += 1;
        self.latest_move = Some(camera.clone());
        Some(camera)
    }

    /// Tapping a drawn route behaves just like picking the line from a list
    pub fn tap_route(
        &mut self,
        line: &LineId,
        catalogue: &Catalogue,
        settings: &Settings,
    ) -> Option<CameraMove> {
        self.select_line(line, catalogue, settings)
    }

    /// Returns true if something was selected before
    pub fn tap_background(&mut self) -> bool {
        self.clear()
    }

    /// Returns true if something was selected before
    pub fn clear(&mut self) -> bool {
        let changed = self.state != SelectionState::Unselected;
        self.state = SelectionState::Unselected;
        changed
    }

    pub fn latest_camera_move(&self) -> Option<&CameraMove> {
        self.latest_move.as_ref()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
